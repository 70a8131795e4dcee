//! Outward notifications and the observer seam used to deliver them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::error::PlaybackError;
use super::gate::CommandGate;
use super::types::{PlaybackState, PositionSample, Volume};

/// Where a position sample came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleOrigin {
    /// Read from the backend by a synchronizer tick (or a transport reset).
    Playback,
    /// Produced by a programmatic seek. Observers must not answer it with
    /// another seek.
    Seek,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    StateChanged(PlaybackState),
    Position(PositionSample, SampleOrigin),
    /// Fresh gate after a transition; observers replace whatever they held.
    CommandsChanged(CommandGate),
    VolumeChanged(Volume),
    /// The loaded track played to the end without an explicit stop.
    TrackEnded,
    Error(PlaybackError),
}

pub trait PlayerObserver {
    fn on_event(&mut self, event: &PlayerEvent);
}

/// Observer that buffers events for a consumer on the same thread.
///
/// Clones share one buffer: subscribe one clone to the controller and drain
/// through another.
#[derive(Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<PlayerEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered event in arrival order.
    pub fn drain(&self) -> Vec<PlayerEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl PlayerObserver for EventQueue {
    fn on_event(&mut self, event: &PlayerEvent) {
        self.events.borrow_mut().push_back(event.clone());
    }
}
