//! Playback context snapshot

use cadence_core::{LastPlayed, PlaybackStatus, Playlist, Track, TrackId};

/// Snapshot of the current playback state
///
/// Every controller operation takes the current snapshot and, on success,
/// hands back a replacement. The host owns the snapshot and decides how to
/// propagate it (signal, store, channel).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackContext {
    /// Active track, if any (may be set without anything loaded after a restore)
    pub current_audio: Option<Track>,

    /// Last status reported by the handle; `None` if nothing has been loaded
    pub sound_obj: Option<PlaybackStatus>,

    pub is_playing: bool,

    /// Index of `current_audio` in `audio_files`
    pub current_audio_index: Option<usize>,

    /// Library in display order, stable for the session
    pub audio_files: Vec<Track>,

    pub is_play_list_running: bool,
    pub active_playlist: Option<Playlist>,

    /// Last observed transport position in milliseconds
    pub playback_position: Option<u64>,

    /// Last observed track duration in milliseconds
    pub playback_duration: Option<u64>,
}

impl PlaybackContext {
    /// Fresh session over `audio_files`
    pub fn new(audio_files: Vec<Track>) -> Self {
        Self {
            audio_files,
            ..Default::default()
        }
    }

    /// Fresh session with the track from a previous session pre-selected
    ///
    /// Nothing is loaded. Returns a plain fresh session if the stored track
    /// is no longer in the library.
    pub fn restored(audio_files: Vec<Track>, last: LastPlayed) -> Self {
        let mut context = Self::new(audio_files);
        if let Some(index) = context.index_of(&last.track.id) {
            context.current_audio = Some(last.track);
            context.current_audio_index = Some(index);
        }
        context
    }

    pub fn total_audio_count(&self) -> usize {
        self.audio_files.len()
    }

    /// Position of a track in the library
    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.audio_files.iter().position(|track| &track.id == id)
    }

    /// Something has been loaded into the handle
    pub fn is_loaded(&self) -> bool {
        self.sound_obj.is_some_and(|status| status.is_loaded)
    }

    /// Whether `track` is the active one
    pub fn is_current(&self, track: &Track) -> bool {
        self.current_audio
            .as_ref()
            .is_some_and(|current| current.is_same(track))
    }

    /// Best known duration of the active track
    pub fn known_duration(&self) -> Option<u64> {
        self.sound_obj
            .and_then(|status| status.duration_millis)
            .or(self.playback_duration)
            .or_else(|| self.current_audio.as_ref().and_then(|t| t.duration_ms))
    }
}
