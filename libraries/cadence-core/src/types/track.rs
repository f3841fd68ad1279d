/// Track and playlist domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Playable track descriptor
///
/// Identity is the `id` alone: two descriptors with the same id refer to the
/// same track even if one carries a resume offset and the other does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique, stable track identifier
    pub id: TrackId,

    /// Playable resource locator (local file or remote stream)
    pub uri: String,

    /// Display title
    pub title: String,

    /// Track duration in milliseconds, when the host knows it up front
    pub duration_ms: Option<u64>,

    /// Resume offset in milliseconds
    pub last_position: Option<u64>,
}

impl Track {
    /// Create a new track with the title taken from the last URI segment
    pub fn new(id: impl Into<TrackId>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let title = uri
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(uri.as_str())
            .to_string();

        Self {
            id: id.into(),
            uri,
            title,
            duration_ms: None,
            last_position: None,
        }
    }

    /// Set the known duration
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the resume offset
    #[must_use]
    pub fn with_last_position(mut self, position_ms: u64) -> Self {
        self.last_position = Some(position_ms);
        self
    }

    /// Resume offset, if one is set and non-zero
    pub fn resume_position(&self) -> Option<u64> {
        self.last_position.filter(|&position| position > 0)
    }

    /// Whether `other` describes the same track
    pub fn is_same(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

/// Secondary playlist context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Tracks in playback order
    pub audios: Vec<Track>,
}

impl Playlist {
    /// Create a new playlist
    pub fn new(id: impl Into<String>, title: impl Into<String>, audios: Vec<Track>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            audios,
        }
    }

    /// Position of a track in this playlist
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.audios.iter().position(|track| &track.id == id)
    }
}
