//! Small value types shared by the controller, the synchronizer and the UI:
//! transport state, transport commands, position samples and volume.

use std::fmt;
use std::time::Duration;

/// The transport state of the controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Transport operations whose availability the `CommandGate` reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Load,
    Play,
    Pause,
    Stop,
    Seek,
    Volume,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Load,
        Command::Play,
        Command::Pause,
        Command::Stop,
        Command::Seek,
        Command::Volume,
    ];
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Seek => "seek",
            Self::Volume => "set volume",
        };
        f.write_str(s)
    }
}

/// One reading of playback progress. Derived on every tick, never stored
/// beyond the latest one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionSample {
    pub elapsed: Duration,
    pub total: Duration,
    /// `elapsed / total`, always within `[0, 1]`.
    pub normalized: f64,
}

impl PositionSample {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        let normalized = if total.is_zero() {
            0.0
        } else {
            (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        };
        Self {
            elapsed,
            total,
            normalized,
        }
    }

    pub fn zero(total: Duration) -> Self {
        Self::new(Duration::ZERO, total)
    }
}

impl Default for PositionSample {
    fn default() -> Self {
        Self::zero(Duration::ZERO)
    }
}

/// Output volume, clamped to `[0.0, 1.0]` on construction.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const MAX: Volume = Volume(1.0);

    pub fn new(v: f32) -> Self {
        if v.is_nan() {
            return Self(0.0);
        }
        Self(v.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Shift by `delta`, clamping the result.
    pub fn step(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// Clamp a requested normalized position into `[0, 1]`; NaN maps to the start.
pub(crate) fn clamp_normalized(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
