//! Error types for playback orchestration

use cadence_core::{CadenceError, TrackId};
use std::fmt;
use thiserror::Error;

/// Playback handle call that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveOp {
    Load,
    Play,
    Pause,
    Seek,
    Stop,
    Unload,
    Status,
}

impl PrimitiveOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveOp::Load => "load",
            PrimitiveOp::Play => "play",
            PrimitiveOp::Pause => "pause",
            PrimitiveOp::Seek => "seek",
            PrimitiveOp::Stop => "stop",
            PrimitiveOp::Unload => "unload",
            PrimitiveOp::Status => "status",
        }
    }
}

impl fmt::Display for PrimitiveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A call into the playback handle failed
    ///
    /// Effects issued before the failing call are not rolled back; the
    /// context is left as it was before the operation.
    #[error("Playback handle call `{operation}` failed: {source}")]
    PrimitiveCall {
        operation: PrimitiveOp,
        #[source]
        source: CadenceError,
    },

    /// Selected track is not part of the library
    #[error("Track not in library: {0}")]
    TrackNotFound(TrackId),

    /// Next/previous on an empty library
    #[error("Library is empty")]
    EmptyLibrary,

    /// Seek fraction outside [0, 1]
    #[error("Invalid seek fraction: {0}")]
    InvalidSeekFraction(f64),
}

impl PlaybackError {
    pub(crate) fn primitive(operation: PrimitiveOp, source: CadenceError) -> Self {
        Self::PrimitiveCall { operation, source }
    }

    /// The failing handle call, for `PrimitiveCall` errors
    pub fn operation(&self) -> Option<PrimitiveOp> {
        match self {
            Self::PrimitiveCall { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
