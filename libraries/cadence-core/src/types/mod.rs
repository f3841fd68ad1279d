//! Domain types for Cadence

mod ids;
mod last_played;
mod status;
mod track;

pub use ids::TrackId;
pub use last_played::LastPlayed;
pub use status::{LoadOptions, PlaybackStatus};
pub use track::{Playlist, Track};
