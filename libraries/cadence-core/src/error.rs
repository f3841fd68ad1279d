/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
///
/// Returned by implementations of the collaborator traits. The playback
/// controller wraps these with the name of the call that failed.
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Playback handle errors (invalid URI, codec, revoked permission, ...)
    #[error("Audio error: {0}")]
    Audio(String),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request the handle refuses outright (e.g. an empty URI)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CadenceError {
    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
