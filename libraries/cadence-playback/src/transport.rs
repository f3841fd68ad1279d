//! Transport control button model
//!
//! Icon choice and press handling for the four transport buttons. Rendering
//! is left to the host UI.

use crate::context::PlaybackContext;
use crate::types::Intent;
use serde::{Deserialize, Serialize};

/// Transport button kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportButton {
    /// Shown while playing; pressing pauses
    Play,
    /// Shown while paused; pressing plays
    Pause,
    Next,
    Prev,
}

impl TransportButton {
    /// Glyph name in the AntDesign icon set
    ///
    /// `Play` shows the pause glyph and `Pause` the play glyph: the icon
    /// advertises what a press will do. `banckward` is the glyph's real name.
    pub fn icon_name(&self) -> &'static str {
        match self {
            TransportButton::Play => "pausecircle",
            TransportButton::Pause => "playcircleo",
            TransportButton::Next => "forward",
            TransportButton::Prev => "banckward",
        }
    }

    /// Play/pause button kind for the current transport state
    pub fn for_playback(is_playing: bool) -> Self {
        if is_playing {
            TransportButton::Play
        } else {
            TransportButton::Pause
        }
    }

    /// Intent forwarded when the button is pressed
    ///
    /// Play/pause re-selects the current track, which toggles it. Returns
    /// `None` for play/pause when no track is active.
    pub fn intent(&self, context: &PlaybackContext) -> Option<Intent> {
        match self {
            TransportButton::Play | TransportButton::Pause => context
                .current_audio
                .clone()
                .map(|track| Intent::Select {
                    track,
                    playlist: None,
                }),
            TransportButton::Next => Some(Intent::Next),
            TransportButton::Prev => Some(Intent::Previous),
        }
    }
}
