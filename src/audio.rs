//! Audio output channels backed by rodio.
//!
//! The application drives three independent channels: one for music and one
//! per alert sound. Each channel owns its own sink, so pausing one never
//! touches another.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::model::AudioSource;

/// A single playback channel.
///
/// Completion is observed by polling [`AudioOutput::take_finished`] from the
/// UI tick, which reports the end of the loaded media exactly once.
pub trait AudioOutput: Send {
    /// Replace the loaded media. Fails when the source cannot be decoded.
    fn load(&mut self, source: &AudioSource) -> Result<()>;
    /// Start or continue playback of the loaded media.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Restart the loaded media from the beginning and play it.
    fn replay(&mut self) -> Result<()>;
    /// Drop the loaded media.
    fn unload(&mut self);
    fn has_source(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn take_finished(&mut self) -> bool;
}

/// Owns the OS audio stream. Must outlive every channel created from it.
pub struct AudioBackend {
    stream: OutputStream,
}

impl AudioBackend {
    pub fn new() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| anyhow!("failed to open audio output: {e}"))?;
        stream.log_on_drop(false);
        tracing::info!("Audio output opened");
        Ok(Self { stream })
    }

    pub fn channel(&self, label: &'static str) -> RodioOutput {
        RodioOutput::new(self.stream.mixer().clone(), label)
    }
}

pub struct RodioOutput {
    label: &'static str,
    mixer: Mixer,
    sink: Option<Sink>,
    bytes: Option<Vec<u8>>,
    started: bool,
}

impl RodioOutput {
    fn new(mixer: Mixer, label: &'static str) -> Self {
        Self {
            label,
            mixer,
            sink: None,
            bytes: None,
            started: false,
        }
    }

    /// Build a fresh paused sink holding the loaded bytes.
    fn rebuild_sink(&mut self) -> Result<()> {
        let Some(bytes) = &self.bytes else {
            bail!("no audio loaded on {} channel", self.label);
        };
        let decoder = Decoder::new(Cursor::new(bytes.clone()))
            .with_context(|| format!("unsupported audio format on {} channel", self.label))?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.append(decoder);
        self.sink = Some(sink);
        self.started = false;
        Ok(())
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, source: &AudioSource) -> Result<()> {
        let bytes = match read_source(source) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.unload();
                return Err(e);
            }
        };
        self.bytes = Some(bytes);
        if let Err(e) = self.rebuild_sink() {
            self.unload();
            return Err(e);
        }
        tracing::debug!(channel = self.label, "Audio source loaded");
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        // A drained sink plays nothing; start the media over
        if self.sink.as_ref().is_some_and(|s| s.empty()) {
            self.rebuild_sink()?;
        }
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| anyhow!("no audio loaded on {} channel", self.label))?;
        sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn replay(&mut self) -> Result<()> {
        self.rebuild_sink()?;
        self.play()
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.bytes = None;
        self.started = false;
    }

    fn has_source(&self) -> bool {
        self.bytes.is_some()
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.is_paused())
    }

    fn take_finished(&mut self) -> bool {
        let finished = self.started && self.sink.as_ref().is_some_and(|s| s.empty());
        if finished {
            self.started = false;
        }
        finished
    }
}

/// Channel with no audible output.
///
/// For alerts whose sound file is missing, playback completes immediately so
/// pauses and resumes still happen. Without an audio device the music channel
/// uses [`SilentOutput::holding`], which never completes on its own.
#[derive(Default)]
pub struct SilentOutput {
    loaded: bool,
    paused: bool,
    holds: bool,
    pending_finish: bool,
}

impl SilentOutput {
    pub fn holding() -> Self {
        Self {
            holds: true,
            paused: true,
            ..Self::default()
        }
    }
}

impl AudioOutput for SilentOutput {
    fn load(&mut self, _source: &AudioSource) -> Result<()> {
        self.loaded = true;
        self.paused = true;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.holds {
            self.paused = false;
        } else {
            self.pending_finish = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn replay(&mut self) -> Result<()> {
        self.play()
    }

    fn unload(&mut self) {
        self.loaded = false;
        self.paused = true;
        self.pending_finish = false;
    }

    fn has_source(&self) -> bool {
        self.loaded
    }

    fn is_paused(&self) -> bool {
        !self.holds || self.paused
    }

    fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.pending_finish)
    }
}

/// Resolve a source into raw encoded audio bytes.
pub fn read_source(source: &AudioSource) -> Result<Vec<u8>> {
    match source {
        AudioSource::Embedded(data_url) => decode_data_url(data_url),
        AudioSource::Url(url) => {
            if url.starts_with("http://") || url.starts_with("https://") {
                bail!("remote audio sources are not supported: {url}");
            }
            let path = url.strip_prefix("file://").unwrap_or(url);
            std::fs::read(Path::new(path)).with_context(|| format!("failed to read {path}"))
        }
    }
}

/// Encode a file's bytes as a `data:` URL, guessing the MIME type from its name.
pub fn encode_data_url(file_name: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}

pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("malformed data URL"))?;
    if !header.ends_with(";base64") {
        bail!("data URL is not base64 encoded");
    }
    STANDARD.decode(payload).context("invalid base64 payload")
}

#[cfg(test)]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// What a [`FakeOutput`] has been asked to do
    #[derive(Default, Debug)]
    pub struct FakeOutputLog {
        pub loaded: Vec<AudioSource>,
        pub plays: usize,
        pub pauses: usize,
        pub replays: usize,
        pub playing: bool,
        pub has_source: bool,
        pub finished: bool,
        pub reject: bool,
    }

    /// In-memory channel; the test keeps a handle to the shared log.
    #[derive(Clone, Default)]
    pub struct FakeOutput {
        pub log: Arc<Mutex<FakeOutputLog>>,
    }

    impl FakeOutput {
        pub fn rejecting() -> Self {
            let out = Self::default();
            out.log.lock().unwrap().reject = true;
            out
        }

        pub fn finish(&self) {
            let mut log = self.log.lock().unwrap();
            log.playing = false;
            log.finished = true;
        }

        pub fn playing(&self) -> bool {
            self.log.lock().unwrap().playing
        }
    }

    impl AudioOutput for FakeOutput {
        fn load(&mut self, source: &AudioSource) -> Result<()> {
            let mut log = self.log.lock().unwrap();
            log.loaded.push(source.clone());
            log.playing = false;
            if log.reject {
                log.has_source = false;
                bail!("unsupported audio format");
            }
            log.has_source = true;
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            let mut log = self.log.lock().unwrap();
            if !log.has_source {
                bail!("no source");
            }
            log.plays += 1;
            log.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.pauses += 1;
            log.playing = false;
        }

        fn replay(&mut self) -> Result<()> {
            let mut log = self.log.lock().unwrap();
            log.replays += 1;
            log.playing = true;
            Ok(())
        }

        fn unload(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.has_source = false;
            log.playing = false;
        }

        fn has_source(&self) -> bool {
            self.log.lock().unwrap().has_source
        }

        fn is_paused(&self) -> bool {
            !self.log.lock().unwrap().playing
        }

        fn take_finished(&mut self) -> bool {
            std::mem::take(&mut self.log.lock().unwrap().finished)
        }
    }
}
