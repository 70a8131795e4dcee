//! Periodic position sampling.
//!
//! The synchronizer does not own a timer. The runtime's poll loop calls
//! `PlaybackController::tick` every `interval()`, on the same thread that
//! runs transport operations, so ticks and seeks interleave only at tick
//! boundaries.

use std::time::Duration;

use super::backend::AudioSession;
use super::types::PositionSample;

/// What a single tick should do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickAction {
    /// Not ticking (paused, stopped or no session).
    Idle,
    /// A seek happened since the last tick; skip this backend read.
    Suppressed,
    /// Read the backend and publish.
    Sample,
}

#[derive(Debug)]
pub struct PositionSynchronizer {
    interval: Duration,
    active: bool,
    /// One-shot guard set by a programmatic seek, consumed by the next tick.
    programmatic: bool,
}

impl PositionSynchronizer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: false,
            programmatic: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.programmatic = false;
    }

    pub fn mark_programmatic(&mut self) {
        self.programmatic = true;
    }

    #[cfg(test)]
    pub fn is_programmatic(&self) -> bool {
        self.programmatic
    }

    /// Decide what this tick does. Always clears the seek guard, so it never
    /// outlives one update cycle.
    pub fn begin_tick(&mut self) -> TickAction {
        let suppressed = std::mem::take(&mut self.programmatic);
        if !self.active {
            TickAction::Idle
        } else if suppressed {
            TickAction::Suppressed
        } else {
            TickAction::Sample
        }
    }

    pub fn sample(session: &dyn AudioSession) -> PositionSample {
        PositionSample::new(session.position(), session.duration())
    }
}
