/// Last-played record used to resume on next start
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// The track that was active when the previous session ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPlayed {
    /// The track, carrying its resume offset in `last_position`
    pub track: Track,

    /// Index of the track in the library at the time it was stored
    pub index: usize,

    /// Unix timestamp of the last write
    pub updated_at: i64,
}

impl LastPlayed {
    /// Create a record stamped with the current time
    pub fn new(track: Track, index: usize) -> Self {
        Self {
            track,
            index,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}
