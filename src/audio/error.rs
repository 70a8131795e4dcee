use std::path::PathBuf;

use thiserror::Error;

use super::types::{Command, PlaybackState};

/// Failures reported by an `AudioBackend` or one of its sessions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The file is missing, unreadable or in a format the decoder rejects.
    #[error("unreadable media: {0}")]
    Unreadable(String),

    /// The output device failed to open or to carry out a request.
    #[error("audio device error: {0}")]
    Device(String),
}

/// Coarse classification of a `PlaybackError`, for observers that only need
/// to branch on the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    TrackUnavailable,
    NoTrackLoaded,
    InvalidStateTransition,
    BackendFailure,
}

/// Everything the controller can refuse or fail at. None of these end the
/// process; the controller reports them and stays in a consistent state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("cannot open {}: {detail}", path.display())]
    TrackUnavailable { path: PathBuf, detail: String },

    #[error("no track loaded")]
    NoTrackLoaded,

    #[error("cannot {op} while {from}")]
    InvalidStateTransition { from: PlaybackState, op: Command },

    #[error("playback failed: {0}")]
    BackendFailure(String),
}

impl PlaybackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TrackUnavailable { .. } => ErrorKind::TrackUnavailable,
            Self::NoTrackLoaded => ErrorKind::NoTrackLoaded,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::BackendFailure(_) => ErrorKind::BackendFailure,
        }
    }

    /// Map an `open` failure for `path` onto the controller's taxonomy.
    pub(crate) fn from_open(path: PathBuf, err: BackendError) -> Self {
        match err {
            BackendError::Unreadable(detail) => Self::TrackUnavailable { path, detail },
            BackendError::Device(detail) => Self::BackendFailure(detail),
        }
    }
}

impl From<BackendError> for PlaybackError {
    fn from(err: BackendError) -> Self {
        Self::BackendFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
