//! Core types for playback orchestration

use cadence_core::{LoadOptions, Playlist, Track};
use serde::{Deserialize, Serialize};

/// Navigation direction for next/previous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// Partial playlist fields merged into the context produced by a select
///
/// Used to start or replace a secondary playlist. Without an override a
/// select clears any running playlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistOverride {
    /// Whether the playlist drives auto-advance
    pub is_play_list_running: bool,

    /// The playlist itself
    pub active_playlist: Option<Playlist>,
}

impl PlaylistOverride {
    /// Start `playlist` as the running secondary playlist
    pub fn running(playlist: Playlist) -> Self {
        Self {
            is_play_list_running: true,
            active_playlist: Some(playlist),
        }
    }
}

/// User request handed to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Pick a specific track (play, pause, resume or switch)
    Select {
        track: Track,
        playlist: Option<PlaylistOverride>,
    },

    /// Advance to the next track, wrapping at the end
    Next,

    /// Go back to the previous track, wrapping at the start
    Previous,

    /// Seek to a relative position in the current track
    Seek { fraction: f64 },
}

impl Intent {
    /// Select `track` without a playlist override
    pub fn select(track: Track) -> Self {
        Self::Select {
            track,
            playlist: None,
        }
    }
}

impl From<Direction> for Intent {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Next => Intent::Next,
            Direction::Previous => Intent::Previous,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Interval between status updates from the handle (default: 1000ms)
    #[serde(default = "default_progress_update_interval_ms")]
    pub progress_update_interval_ms: u64,
}

fn default_progress_update_interval_ms() -> u64 {
    1000
}

impl PlayerConfig {
    /// Load options for a fresh track
    pub fn load_options(&self, autoplay: bool) -> LoadOptions {
        LoadOptions {
            autoplay,
            progress_update_interval_ms: self.progress_update_interval_ms,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            progress_update_interval_ms: default_progress_update_interval_ms(),
        }
    }
}
