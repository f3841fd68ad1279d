//! Cadence Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `PlaybackStatus`, `LastPlayed`
//! - **Collaborator Traits**: `PlaybackPrimitive` (the native playback handle)
//!   and `LastPlayedStore` (resume-on-next-start persistence)
//! - **Error Handling**: unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Playlist, Track};
//!
//! let intro = Track::new("intro", "file:///music/intro.mp3").with_duration_ms(95_000);
//! let outro = Track::new("outro", "file:///music/outro.mp3");
//!
//! assert_eq!(intro.title, "intro.mp3");
//!
//! let playlist = Playlist::new("night", "Night Drive", vec![intro, outro]);
//! assert_eq!(playlist.audios.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use traits::{LastPlayedStore, NoopStore, PlaybackPrimitive, StatusCallback};
pub use types::{LastPlayed, LoadOptions, PlaybackStatus, Playlist, Track, TrackId};
