//! Playlist and playback commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::join_all;

use crate::audio::encode_data_url;
use crate::model::{AudioSource, Track};
use super::AppController;

impl AppController {
    pub async fn toggle_playback(&self) {
        self.model.lock().await.toggle_play_pause();
    }

    pub async fn next_track(&self) {
        self.model.lock().await.next_track();
    }

    pub async fn previous_track(&self) {
        self.model.lock().await.previous_track();
    }

    pub async fn play_selected(&self) {
        self.model.lock().await.play_selected();
    }

    pub async fn delete_selected(&self) {
        self.model.lock().await.delete_selected();
    }

    pub async fn clear_playlist(&self) {
        self.model.lock().await.clear_playlist();
    }

    /// Read every listed file concurrently and append what could be read.
    pub async fn add_files(&self, input: &str) {
        let paths = split_paths(input);
        if paths.is_empty() {
            return;
        }
        tracing::debug!(count = paths.len(), "Reading files");
        let decoded = join_all(paths.into_iter().map(read_track)).await;
        self.model.lock().await.add_tracks(decoded);
    }
}

/// Load a file into an embedded-data track named after the file.
pub async fn read_track(path: PathBuf) -> Result<Track> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = file_name(&path);
    let data_url = encode_data_url(&name, &bytes);
    Ok(Track {
        name,
        source: AudioSource::Embedded(data_url),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split prompt input into paths: whitespace separated, double quotes group,
/// a leading `~/` expands to `$HOME`.
pub fn split_paths(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    paths.push(expand_home(&std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(expand_home(&current));
    }
    paths
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode_data_url;

    #[test]
    fn splits_plain_and_quoted_paths() {
        let paths = split_paths(r#"a.mp3  "my song.ogg"	/tmp/b.flac "#);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.mp3"),
                PathBuf::from("my song.ogg"),
                PathBuf::from("/tmp/b.flac"),
            ]
        );
        assert!(split_paths("   ").is_empty());
    }

    #[tokio::test]
    async fn reads_file_into_embedded_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takbir.mp3");
        std::fs::write(&path, b"ID3 fake").unwrap();

        let track = read_track(path).await.unwrap();
        assert_eq!(track.name, "takbir.mp3");
        let AudioSource::Embedded(url) = &track.source else {
            panic!("expected embedded data");
        };
        assert!(url.starts_with("data:audio/mpeg;base64,"));
        assert_eq!(decode_data_url(url).unwrap(), b"ID3 fake");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_track(dir.path().join("nope.mp3")).await.is_err());
    }
}
