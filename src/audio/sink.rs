//! `rodio` implementation of the audio backend.
//!
//! The backend opens one `OutputStream` on its first `open` and every session
//! connects its own `Sink` to that stream's mixer. Volume is applied on the sink, i.e. on
//! the output path, never by amplifying the decoded source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::library::Track;

use super::backend::{AudioBackend, AudioSession};
use super::error::BackendError;
use super::types::Volume;

const LOG_TARGET: &str = "segue::audio::sink";

/// Opens the default output device on first use and keeps it afterwards.
/// A missing device fails that `open` only, so the caller can retry.
#[derive(Default)]
pub struct RodioBackend {
    stream: Option<OutputStream>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn mixer(&mut self) -> Result<Mixer, BackendError> {
        if let Some(stream) = &self.stream {
            return Ok(stream.mixer().clone());
        }
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the terminal.
        stream.log_on_drop(false);
        debug!(target: LOG_TARGET, "opened default output stream");
        let mixer = stream.mixer().clone();
        self.stream = Some(stream);
        Ok(mixer)
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioSession>, BackendError> {
        // A bad file is reported as unreadable even without a device.
        let source = decode(&track.path)?;
        let mixer = self.mixer()?;
        Ok(Box::new(SinkSession::open(mixer, track, source)))
    }
}

type FileDecoder = Decoder<BufReader<File>>;

fn decode(path: &Path) -> Result<FileDecoder, BackendError> {
    let file = File::open(path)
        .map_err(|e| BackendError::Unreadable(format!("{}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| BackendError::Unreadable(format!("{}: {e}", path.display())))
}

/// The decoder's total wins; containers that cannot tell fall back to the
/// duration read from the tags.
fn resolve_duration(decoded: Option<Duration>, tagged: Duration) -> Duration {
    decoded.unwrap_or(tagged)
}

/// Create a paused `Sink` playing `source` from `start_at`.
fn create_sink_at(mixer: &Mixer, source: FileDecoder, start_at: Duration) -> Sink {
    let sink = Sink::connect_new(mixer);
    sink.pause();
    // `skip_duration` is the fallback seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink
}

struct SinkSession {
    mixer: Mixer,
    path: PathBuf,
    sink: Sink,
    duration: Duration,
    volume: Volume,
    /// Start offset of the current sink when it was built with `skip_duration`;
    /// `Sink::get_pos` counts from the appended source's start.
    offset: Duration,
}

impl SinkSession {
    fn open(mixer: Mixer, track: &Track, source: FileDecoder) -> Self {
        let duration = resolve_duration(source.total_duration(), track.duration);
        let sink = create_sink_at(&mixer, source, Duration::ZERO);
        debug!(
            target: LOG_TARGET,
            "opened {} ({:.1}s)",
            track.path.display(),
            duration.as_secs_f64()
        );
        Self {
            mixer,
            path: track.path.clone(),
            sink,
            duration,
            volume: Volume::default(),
            offset: Duration::ZERO,
        }
    }

    /// Replace the sink with a fresh one positioned at `at`, keeping the
    /// play/pause state and volume.
    fn rebuild_at(&mut self, at: Duration) -> Result<(), BackendError> {
        let was_paused = self.sink.is_paused();
        let sink = create_sink_at(&self.mixer, decode(&self.path)?, at);
        sink.set_volume(self.volume.get());
        if !was_paused {
            sink.play();
        }
        self.sink.stop();
        self.sink = sink;
        self.offset = at;
        Ok(())
    }

    fn move_to(&mut self, at: Duration) -> Result<(), BackendError> {
        if self.sink.empty() {
            return self.rebuild_at(at);
        }
        match self.sink.try_seek(at) {
            Ok(()) => {
                self.offset = Duration::ZERO;
                Ok(())
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "seek failed ({e}), rebuilding sink at {at:?}");
                self.rebuild_at(at)
            }
        }
    }
}

impl AudioSession for SinkSession {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.sink.pause();
        self.move_to(Duration::ZERO)
    }

    fn set_position(&mut self, position: Duration) -> Result<(), BackendError> {
        let target = if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        };
        self.move_to(target)
    }

    fn position(&self) -> Duration {
        let pos = self.offset + self.sink.get_pos();
        if self.duration.is_zero() {
            pos
        } else {
            pos.min(self.duration)
        }
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.sink.set_volume(volume.get());
    }

    fn has_ended(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for SinkSession {
    fn drop(&mut self) {
        self.sink.stop();
        debug!(target: LOG_TARGET, "closed {}", self.path.display());
    }
}
