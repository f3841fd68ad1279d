/// Playback handle status snapshot and load options
use serde::{Deserialize, Serialize};

/// Status reported by a playback handle
///
/// Returned from every transport call and pushed through the status
/// subscription while something is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// A resource is loaded into the handle
    pub is_loaded: bool,

    /// The handle is currently producing audio
    pub is_playing: bool,

    /// Transport position in milliseconds
    pub position_millis: u64,

    /// Track duration in milliseconds (unknown for some streams)
    pub duration_millis: Option<u64>,

    /// Set on the one update emitted when the track reaches its end
    pub did_just_finish: bool,
}

impl PlaybackStatus {
    /// Status of a handle with nothing loaded
    pub fn unloaded() -> Self {
        Self::default()
    }
}

/// Options for loading a resource into the playback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Start playing as soon as the resource is loaded
    pub autoplay: bool,

    /// Interval between status updates in milliseconds
    pub progress_update_interval_ms: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            progress_update_interval_ms: 1000,
        }
    }
}
