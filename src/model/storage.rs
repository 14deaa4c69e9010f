//! Durable playlist storage: a single JSON array of `{name, dataURL}` records

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::StoredTrack;

pub const DEFAULT_PLAYLIST_FILE: &str = ".cache/playlist.json";

pub trait PlaylistStore: Send {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<StoredTrack>>>;
    fn save(&self, tracks: &[StoredTrack]) -> Result<()>;
}

/// Playlist kept in a JSON file on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaylistStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<StoredTrack>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let tracks: Vec<StoredTrack> =
            serde_json::from_str(&content).context("invalid playlist storage")?;
        Ok(Some(tracks))
    }

    fn save(&self, tracks: &[StoredTrack]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string(tracks)?;
        // Write then rename; readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> StoredTrack {
        StoredTrack {
            name: name.to_string(),
            data_url: Some(format!("data:audio/mpeg;base64,{name}")),
            url: None,
        }
    }

    #[test]
    fn missing_file_loads_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("playlist.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_directories_and_reloads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/playlist.json"));
        let tracks = vec![record("b"), record("a"), record("c")];
        store.save(&tracks).unwrap();
        assert_eq!(store.load().unwrap(), Some(tracks));
    }

    #[test]
    fn writes_name_and_data_url_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("playlist.json"));
        store.save(&[record("x")]).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"[{"name":"x","dataURL":"data:audio/mpeg;base64,x"}]"#);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStore::new(path).load().is_err());
    }
}
