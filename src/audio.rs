//! Playback control core.
//!
//! `PlaybackController` owns one `AudioSession` at a time and drives the
//! transport state machine; `PositionSynchronizer` publishes position samples
//! on ticks; `CommandGate` says which operations are legal right now.
//! Observers receive `PlayerEvent`s through `PlayerObserver`.

mod backend;
mod error;
mod events;
mod gate;
mod player;
mod sink;
mod sync;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{AudioBackend, AudioSession};
pub use error::{BackendError, ErrorKind, PlaybackError};
pub use events::{EventQueue, PlayerEvent, PlayerObserver, SampleOrigin};
pub use gate::CommandGate;
pub use player::PlaybackController;
pub use sink::RodioBackend;
pub use sync::PositionSynchronizer;
pub use types::{Command, PlaybackState, PositionSample, Volume};
