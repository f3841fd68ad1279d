/// Collaborator traits for Cadence
use crate::error::Result;
use crate::types::{LastPlayed, LoadOptions, PlaybackStatus, Track};
use async_trait::async_trait;
use std::sync::Arc;

/// Callback receiving asynchronous status updates from a playback handle
pub type StatusCallback = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;

/// Native audio playback handle
///
/// A single active resource at a time. Implementations wrap whatever the
/// platform provides (a mobile media player, a desktop output stream, a test
/// double). Control methods take `&mut self`: the handle is exclusively owned
/// by one controller.
#[async_trait]
pub trait PlaybackPrimitive: Send {
    /// Load a resource, replacing nothing (callers unload first)
    ///
    /// # Errors
    /// Returns an error if the URI cannot be opened or decoded
    async fn load(&mut self, uri: &str, options: LoadOptions) -> Result<PlaybackStatus>;

    /// Start or resume playback of the loaded resource
    async fn play(&mut self) -> Result<PlaybackStatus>;

    /// Pause playback, keeping the position
    async fn pause(&mut self) -> Result<PlaybackStatus>;

    /// Move the transport to `position_ms`
    ///
    /// Some platforms pause on seek; callers resume explicitly.
    async fn seek(&mut self, position_ms: u64) -> Result<PlaybackStatus>;

    /// Stop playback and rewind
    async fn stop(&mut self) -> Result<()>;

    /// Release the loaded resource
    async fn unload(&mut self) -> Result<()>;

    /// Current status snapshot
    async fn status(&mut self) -> Result<PlaybackStatus>;

    /// Register the status subscription
    ///
    /// Loading a new resource drops the previous subscription, so this has to
    /// be called again after every load.
    fn on_status_update(&mut self, callback: StatusCallback);
}

/// Durable "last audio + index" storage for resuming on next start
#[async_trait]
pub trait LastPlayedStore: Send + Sync {
    /// Record the active track and its index in the library
    ///
    /// `track.last_position` carries the resume offset, if any.
    async fn store_last_played(&self, track: &Track, index: usize) -> Result<()>;

    /// Read back the last record, if one exists
    async fn load_last_played(&self) -> Result<Option<LastPlayed>>;
}

/// Store that keeps nothing
///
/// For hosts that do not resume across sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl LastPlayedStore for NoopStore {
    async fn store_last_played(&self, _track: &Track, _index: usize) -> Result<()> {
        Ok(())
    }

    async fn load_last_played(&self) -> Result<Option<LastPlayed>> {
        Ok(None)
    }
}
