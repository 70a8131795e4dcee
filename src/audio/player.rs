//! `PlaybackController`: owns the loaded track and its backend session and
//! runs the transport state machine.
//!
//! ```text
//! Stopped --play--> Playing --pause--> Paused --play--> Playing
//! Playing/Paused --stop--> Stopped
//! Playing --end of media--> Stopped
//! any --load--> Stopped (fresh session)
//! ```
//!
//! Everything runs on one thread. Errors are returned to the caller *and*
//! published as `PlayerEvent::Error`; state is never left half-applied.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::library::Track;

use super::backend::{AudioBackend, AudioSession};
use super::error::{PlaybackError, Result};
use super::events::{PlayerEvent, PlayerObserver, SampleOrigin};
use super::gate::CommandGate;
use super::sync::{PositionSynchronizer, TickAction};
use super::types::{Command, PlaybackState, PositionSample, Volume, clamp_normalized};

const LOG_TARGET: &str = "segue::audio::player";

pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    session: Option<Box<dyn AudioSession>>,
    track: Option<Track>,
    state: PlaybackState,
    volume: Volume,
    sync: PositionSynchronizer,
    gate: CommandGate,
    last_sample: PositionSample,
    observers: Vec<Box<dyn PlayerObserver>>,
}

impl<B: AudioBackend> PlaybackController<B> {
    pub fn new(backend: B, volume: Volume, tick_interval: Duration) -> Self {
        Self {
            backend,
            session: None,
            track: None,
            state: PlaybackState::Stopped,
            volume,
            sync: PositionSynchronizer::new(tick_interval),
            gate: CommandGate::default(),
            last_sample: PositionSample::default(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O: PlayerObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn commands(&self) -> CommandGate {
        CommandGate::evaluate(self.state, self.session.is_some())
    }

    /// The most recently published position.
    #[cfg(test)]
    pub fn sample(&self) -> PositionSample {
        self.last_sample
    }

    pub fn tick_interval(&self) -> Duration {
        self.sync.interval()
    }

    /// Replace whatever is loaded with `track`, leaving the controller
    /// `Stopped` at position zero.
    ///
    /// The previous session is closed before the new one is opened, so at
    /// most one session exists at any time. On failure nothing is loaded.
    pub fn load(&mut self, track: Track) -> Result<()> {
        self.close_session();
        self.sync.stop();
        self.set_state(PlaybackState::Stopped);

        match self.backend.open(&track) {
            Ok(mut session) => {
                session.set_volume(self.volume);
                let total = session.duration();
                info!(
                    target: LOG_TARGET,
                    "loaded {} ({:.1}s)",
                    track.path.display(),
                    total.as_secs_f64()
                );
                self.session = Some(session);
                self.track = Some(track);
                self.refresh_commands();
                self.publish(PositionSample::zero(total), SampleOrigin::Playback);
                Ok(())
            }
            Err(e) => {
                self.refresh_commands();
                self.publish(PositionSample::default(), SampleOrigin::Playback);
                self.fail(PlaybackError::from_open(track.path, e))
            }
        }
    }

    pub fn play(&mut self) -> Result<()> {
        if self.session.is_none() {
            return self.fail(PlaybackError::NoTrackLoaded);
        }
        if self.state == PlaybackState::Playing {
            return self.reject(Command::Play);
        }

        if let Some(session) = self.session.as_mut() {
            session.play();
        }
        self.sync.start();
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.session.is_none() {
            return self.fail(PlaybackError::NoTrackLoaded);
        }
        if self.state != PlaybackState::Playing {
            return self.reject(Command::Pause);
        }

        let mut frozen = None;
        if let Some(session) = self.session.as_mut() {
            session.pause();
            frozen = Some(PositionSynchronizer::sample(session.as_ref()));
        }
        self.sync.stop();
        self.set_state(PlaybackState::Paused);
        if let Some(sample) = frozen {
            self.publish(sample, SampleOrigin::Playback);
        }
        Ok(())
    }

    /// Halt and rewind. Calling it while already stopped just rewinds again.
    pub fn stop(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            // Nothing loaded means nothing to halt.
            return Ok(());
        };

        let rewound = session.stop();
        let total = session.duration();
        self.sync.stop();

        if let Err(e) = rewound {
            self.close_session();
            self.set_state(PlaybackState::Stopped);
            return self.fail(e.into());
        }

        self.set_state(PlaybackState::Stopped);
        self.publish(PositionSample::zero(total), SampleOrigin::Playback);
        Ok(())
    }

    /// Jump to `normalized` (fraction of the track, clamped to `[0, 1]`).
    ///
    /// Legal in every state once a track is loaded. The published sample is
    /// tagged `SampleOrigin::Seek` and the next tick skips its backend read.
    pub fn seek_to(&mut self, normalized: f64) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return self.fail(PlaybackError::NoTrackLoaded);
        };

        let total = session.duration();
        let target = total.mul_f64(clamp_normalized(normalized));
        if let Err(e) = session.set_position(target) {
            return self.fail(e.into());
        }

        debug!(target: LOG_TARGET, "seek to {:.1}s", target.as_secs_f64());
        self.sync.mark_programmatic();
        self.publish(PositionSample::new(target, total), SampleOrigin::Seek);
        Ok(())
    }

    /// Seek `delta` (fraction of the track) away from the last published
    /// position.
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.seek_to(self.last_sample.normalized + delta)
    }

    /// Store the clamped volume and apply it to the open session, if any.
    /// The value carries over to every session opened later.
    pub fn set_volume(&mut self, volume: f32) -> Volume {
        self.volume = Volume::new(volume);
        if let Some(session) = self.session.as_mut() {
            session.set_volume(self.volume);
        }
        self.emit(PlayerEvent::VolumeChanged(self.volume));
        self.volume
    }

    /// Handle the backend reaching end of media without an explicit stop.
    pub fn on_playback_ended(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!(target: LOG_TARGET, "ignoring end of media while {}", self.state);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        info!(target: LOG_TARGET, "end of media");
        let rewound = session.stop();
        let total = session.duration();
        self.sync.stop();

        match rewound {
            Ok(()) => {
                self.set_state(PlaybackState::Stopped);
                self.publish(PositionSample::zero(total), SampleOrigin::Playback);
            }
            Err(e) => {
                self.close_session();
                self.set_state(PlaybackState::Stopped);
                let _ = self.fail(e.into());
            }
        }
        self.emit(PlayerEvent::TrackEnded);
    }

    /// One synchronizer tick: deliver end of media if the backend reports
    /// it, otherwise publish the backend's position while playing.
    pub fn tick(&mut self) {
        let ended = self.state == PlaybackState::Playing
            && self.session.as_ref().is_some_and(|s| s.has_ended());
        if ended {
            self.on_playback_ended();
            return;
        }

        match self.sync.begin_tick() {
            TickAction::Idle => {}
            TickAction::Suppressed => {
                trace!(target: LOG_TARGET, "skipping backend sample right after a seek");
            }
            TickAction::Sample => {
                if let Some(session) = self.session.as_ref() {
                    let sample = PositionSynchronizer::sample(session.as_ref());
                    self.publish(sample, SampleOrigin::Playback);
                }
            }
        }
    }

    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.stop() {
                warn!(target: LOG_TARGET, "error while closing session: {e}");
            }
        }
        if let Some(track) = self.track.take() {
            debug!(target: LOG_TARGET, "closed {}", track.path.display());
        }
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!(target: LOG_TARGET, "{} -> {}", self.state, next);
            self.state = next;
            self.emit(PlayerEvent::StateChanged(next));
        }
        self.refresh_commands();
    }

    fn refresh_commands(&mut self) {
        let gate = self.commands();
        if gate != self.gate {
            self.gate = gate;
            self.emit(PlayerEvent::CommandsChanged(gate));
        }
    }

    fn publish(&mut self, sample: PositionSample, origin: SampleOrigin) {
        self.last_sample = sample;
        self.emit(PlayerEvent::Position(sample, origin));
    }

    fn reject(&mut self, op: Command) -> Result<()> {
        self.fail(PlaybackError::InvalidStateTransition {
            from: self.state,
            op,
        })
    }

    fn fail(&mut self, err: PlaybackError) -> Result<()> {
        warn!(target: LOG_TARGET, "{err}");
        self.emit(PlayerEvent::Error(err.clone()));
        Err(err)
    }

    fn emit(&mut self, event: PlayerEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}
