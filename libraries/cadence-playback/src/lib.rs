//! Cadence - Playback Orchestration
//!
//! A thin state-transition controller over a native playback handle.
//!
//! This crate provides:
//! - `PlaybackContext`: immutable snapshot of what is loaded, playing, and where
//! - A pure reducer turning an intent plus a snapshot into a `Plan`
//!   (ordered handle calls + the resulting transition)
//! - `PlaybackController`: runs plans against a `PlaybackPrimitive`, persists
//!   the last played track, and syncs status updates (auto-advance at end of
//!   track)
//! - Transport button model (icon + intent per button)
//!
//! # Architecture
//!
//! `cadence-playback` never talks to a platform audio API. The handle and the
//! persistence layer are supplied by the host through the
//! `cadence_core::PlaybackPrimitive` and `cadence_core::LastPlayedStore`
//! traits.
//!
//! # Example: Planning without a handle
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::{reducer, Direction, PlaybackContext};
//!
//! let mut context = PlaybackContext::new(vec![
//!     Track::new("a", "file:///a.mp3"),
//!     Track::new("b", "file:///b.mp3"),
//!     Track::new("c", "file:///c.mp3"),
//! ]);
//! context.current_audio_index = Some(2);
//!
//! let plan = reducer::plan_change(&context, Direction::Next, false).unwrap();
//! let status = cadence_core::PlaybackStatus { is_loaded: true, is_playing: true, ..Default::default() };
//! let next = plan.transition.apply(&context, status);
//!
//! assert_eq!(next.current_audio_index, Some(0));
//! assert!(next.is_playing);
//! ```
//!
//! # Example: Driving a handle
//!
//! ```rust,no_run
//! use cadence_core::{NoopStore, PlaybackPrimitive, Track};
//! use cadence_playback::{Intent, PlaybackContext, PlaybackController, PlayerConfig};
//!
//! # async fn example(handle: impl PlaybackPrimitive) -> cadence_playback::Result<()> {
//! let mut controller = PlaybackController::new(handle, NoopStore, PlayerConfig::default());
//! let mut status_rx = controller.status_updates();
//!
//! let mut context = PlaybackContext::new(vec![Track::new("a", "file:///a.mp3")]);
//! let first = context.audio_files[0].clone();
//! if let Some(next) = controller.dispatch(&context, Intent::select(first)).await? {
//!     context = next;
//! }
//!
//! while let Some(status) = status_rx.recv().await {
//!     if let Some(next) = controller.on_status(&context, status).await? {
//!         context = next;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod context;
mod controller;
mod error;
mod events;
pub mod reducer;
mod transport;
pub mod types;

// Public exports
pub use context::PlaybackContext;
pub use controller::PlaybackController;
pub use error::{PlaybackError, PrimitiveOp, Result};
pub use events::{classify, StatusEvent, StatusUpdates};
pub use reducer::{Effect, Plan, Transition};
pub use transport::TransportButton;
pub use types::{Direction, Intent, PlayerConfig, PlaylistOverride};
