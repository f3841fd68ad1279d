//! Pure transition planning
//!
//! Given a context snapshot and an intent, decide which calls the playback
//! handle has to receive and how the snapshot changes once they succeed.
//! Nothing here touches the handle, so every branch can be tested with plain
//! values.
//!
//! ```text
//!              select(other)                 select(same) / pause
//!   Unloaded ─────────────────▶ Playing ◀──────────────────────────▶ Paused
//!      │       next / prev        │  ▲     select(same) / play          │
//!      └──────────────────────────┘  └── next / prev / select(other) ───┘
//! ```

use crate::context::PlaybackContext;
use crate::error::{PlaybackError, Result};
use crate::types::{Direction, PlaylistOverride};
use cadence_core::{PlaybackStatus, Track};

/// A single call into the playback handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load { uri: String, autoplay: bool },
    Seek { position_ms: u64 },
    Play,
    Pause,
    Stop,
    Unload,
    /// Re-register the status subscription (dropped by every load)
    Subscribe,
}

/// What happens to the playlist fields when a new track starts
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistChange {
    Keep,
    Replace(PlaylistOverride),
}

/// How the context changes once all effects have succeeded
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A new track was loaded and is playing
    Start {
        track: Track,
        index: usize,
        playlist: PlaylistChange,
        /// Drop position/duration of the previous track
        reset_progress: bool,
    },
    Pause,
    Resume,
    Seek,
}

impl Transition {
    /// Produce the next snapshot from the final handle status
    pub fn apply(&self, context: &PlaybackContext, status: PlaybackStatus) -> PlaybackContext {
        let mut next = context.clone();
        next.sound_obj = Some(status);

        match self {
            Transition::Start {
                track,
                index,
                playlist,
                reset_progress,
            } => {
                next.current_audio = Some(track.clone());
                next.current_audio_index = Some(*index);
                next.is_playing = true;
                if let PlaylistChange::Replace(replacement) = playlist {
                    next.is_play_list_running = replacement.is_play_list_running;
                    next.active_playlist = replacement.active_playlist.clone();
                }
                if *reset_progress {
                    next.playback_position = None;
                    next.playback_duration = None;
                }
            }
            Transition::Pause => {
                next.is_playing = false;
                next.playback_position = Some(status.position_millis);
            }
            Transition::Resume => {
                next.is_playing = true;
            }
            Transition::Seek => {
                next.playback_position = Some(status.position_millis);
                // Playback resumes after the seek
                next.sound_obj = Some(PlaybackStatus {
                    is_playing: next.is_playing,
                    ..status
                });
            }
        }

        next
    }

    /// Whether the snapshot is taken from the seek call rather than the last
    /// call of the plan
    pub fn reads_seek_status(&self) -> bool {
        matches!(self, Transition::Seek)
    }

    /// Track and library index to hand to the last-played store, if any
    ///
    /// A pause records the paused position as the resume offset.
    pub fn persisted(
        &self,
        context: &PlaybackContext,
        status: PlaybackStatus,
    ) -> Option<(Track, usize)> {
        match self {
            Transition::Start { track, index, .. } => Some((track.clone(), *index)),
            Transition::Pause => {
                let track = context.current_audio.clone()?;
                let index = context.current_audio_index?;
                Some((track.with_last_position(status.position_millis), index))
            }
            Transition::Resume | Transition::Seek => None,
        }
    }
}

/// Ordered handle calls plus the resulting transition
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub effects: Vec<Effect>,
    pub transition: Transition,
}

/// Neighbouring index with wraparound
///
/// An absent current index counts as "before the first" for `Next` and
/// "after the last" for `Previous`. Returns `None` only for an empty list.
pub fn wrap_index(current: Option<usize>, total: usize, direction: Direction) -> Option<usize> {
    if total == 0 {
        return None;
    }
    let last = total - 1;

    let index = match (direction, current) {
        (Direction::Next, None) => 0,
        (Direction::Next, Some(i)) if i >= last => 0,
        (Direction::Next, Some(i)) => i + 1,
        (Direction::Previous, None | Some(0)) => last,
        (Direction::Previous, Some(i)) => i.min(total) - 1,
    };
    Some(index)
}

/// Absolute seek target for a relative position
pub fn seek_target(duration_ms: u64, fraction: f64) -> u64 {
    (duration_ms as f64 * fraction).floor() as u64
}

/// Effects to load `track` and start playing it
///
/// With `resume`, a stored non-zero offset is honoured by loading paused,
/// seeking, then playing.
fn start_effects(track: &Track, resume: bool) -> Vec<Effect> {
    match track.resume_position().filter(|_| resume) {
        Some(position_ms) => vec![
            Effect::Load {
                uri: track.uri.clone(),
                autoplay: false,
            },
            Effect::Seek { position_ms },
            Effect::Play,
            Effect::Subscribe,
        ],
        None => vec![
            Effect::Load {
                uri: track.uri.clone(),
                autoplay: true,
            },
            Effect::Subscribe,
        ],
    }
}

/// Stop and release the current resource, then start `track` from 0
fn replace_effects(track: &Track) -> Vec<Effect> {
    let mut effects = vec![Effect::Stop, Effect::Unload];
    effects.extend(start_effects(track, false));
    effects
}

fn library_index(context: &PlaybackContext, track: &Track) -> Result<usize> {
    context
        .index_of(&track.id)
        .ok_or_else(|| PlaybackError::TrackNotFound(track.id.clone()))
}

/// Plan for the user picking `target`
///
/// Cases, tested in order: nothing loaded (load, resuming if possible),
/// same track playing (pause), same track paused (resume), different track
/// (replace). Returns `None` when a status exists but nothing is loaded.
pub fn plan_select(
    context: &PlaybackContext,
    target: &Track,
    playlist: Option<PlaylistOverride>,
) -> Result<Option<Plan>> {
    let playlist = PlaylistChange::Replace(playlist.unwrap_or_default());

    let Some(status) = context.sound_obj else {
        let index = library_index(context, target)?;
        return Ok(Some(Plan {
            effects: start_effects(target, true),
            transition: Transition::Start {
                track: target.clone(),
                index,
                playlist,
                reset_progress: false,
            },
        }));
    };

    if !status.is_loaded {
        return Ok(None);
    }

    if context.is_current(target) {
        let plan = if status.is_playing {
            Plan {
                effects: vec![Effect::Pause],
                transition: Transition::Pause,
            }
        } else {
            Plan {
                effects: vec![Effect::Play],
                transition: Transition::Resume,
            }
        };
        return Ok(Some(plan));
    }

    let index = library_index(context, target)?;
    Ok(Some(Plan {
        effects: replace_effects(target),
        transition: Transition::Start {
            track: target.clone(),
            index,
            playlist,
            reset_progress: false,
        },
    }))
}

/// Plan for next/previous over the library
///
/// `loaded` is what the handle reports right now, not what the snapshot
/// remembers.
pub fn plan_change(context: &PlaybackContext, direction: Direction, loaded: bool) -> Result<Plan> {
    let index = wrap_index(
        context.current_audio_index,
        context.total_audio_count(),
        direction,
    )
    .ok_or(PlaybackError::EmptyLibrary)?;
    let track = context.audio_files[index].clone();

    let effects = if loaded {
        replace_effects(&track)
    } else {
        start_effects(&track, false)
    };

    Ok(Plan {
        effects,
        transition: Transition::Start {
            track,
            index,
            playlist: PlaylistChange::Keep,
            reset_progress: true,
        },
    })
}

/// Plan for seeking to `fraction` of the current track
///
/// Returns `None` unless something is loaded, playing, and has a known
/// duration.
pub fn plan_seek(context: &PlaybackContext, fraction: f64) -> Result<Option<Plan>> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(PlaybackError::InvalidSeekFraction(fraction));
    }

    if !context.is_loaded() || !context.is_playing {
        return Ok(None);
    }
    let Some(duration_ms) = context.known_duration() else {
        return Ok(None);
    };

    Ok(Some(Plan {
        effects: vec![
            Effect::Seek {
                position_ms: seek_target(duration_ms, fraction),
            },
            Effect::Play,
        ],
        transition: Transition::Seek,
    }))
}

/// Plan for moving to the next track of the running playlist
///
/// Returns `None` when no playlist is running or it is empty; the caller then
/// falls back to library navigation.
pub fn plan_playlist_advance(context: &PlaybackContext) -> Result<Option<Plan>> {
    if !context.is_play_list_running {
        return Ok(None);
    }
    let Some(playlist) = context
        .active_playlist
        .as_ref()
        .filter(|playlist| !playlist.audios.is_empty())
    else {
        return Ok(None);
    };

    let position = context
        .current_audio
        .as_ref()
        .and_then(|current| playlist.position_of(&current.id));
    let Some(next) = wrap_index(position, playlist.audios.len(), Direction::Next) else {
        return Ok(None);
    };
    let track = playlist.audios[next].clone();
    let index = library_index(context, &track)?;

    let effects = if context.is_loaded() {
        replace_effects(&track)
    } else {
        start_effects(&track, false)
    };

    Ok(Some(Plan {
        effects,
        transition: Transition::Start {
            track,
            index,
            playlist: PlaylistChange::Keep,
            reset_progress: true,
        },
    }))
}
