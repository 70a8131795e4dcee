//! The seam between the controller and whatever actually decodes and plays
//! audio. The controller only ever talks to these two traits.

use std::time::Duration;

use crate::library::Track;

use super::error::BackendError;
use super::types::Volume;

/// Opens playback sessions for tracks.
pub trait AudioBackend {
    /// Open and decode `track`, returning a paused session at position zero.
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioSession>, BackendError>;
}

/// A live handle bound to one opened track. Dropping it closes the session
/// and releases every resource it holds.
pub trait AudioSession {
    fn play(&mut self);
    fn pause(&mut self);

    /// Halt output and rewind to position zero.
    fn stop(&mut self) -> Result<(), BackendError>;

    /// Move the read head to `position`. Keeps the current play/pause state.
    fn set_position(&mut self, position: Duration) -> Result<(), BackendError>;

    fn position(&self) -> Duration;
    fn duration(&self) -> Duration;

    fn set_volume(&mut self, volume: Volume);

    /// True once the stream has drained without an explicit stop.
    fn has_ended(&self) -> bool;
}
