//! Status synchronization
//!
//! The playback handle pushes status updates (position, duration, end of
//! track) through the subscription the controller registers after every
//! load. The host drains them and feeds each one back through
//! `PlaybackController::on_status`.

use crate::context::PlaybackContext;
use cadence_core::{PlaybackStatus, StatusCallback};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// What a status update means for the context
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// Current track reached its end; advance
    Finished,

    /// Position/duration moved
    Progress(Box<PlaybackContext>),

    /// Handle has nothing loaded; nothing to sync
    Idle,
}

/// Classify a status update against the current snapshot
pub fn classify(context: &PlaybackContext, status: PlaybackStatus) -> StatusEvent {
    if status.did_just_finish {
        return StatusEvent::Finished;
    }
    if !status.is_loaded {
        return StatusEvent::Idle;
    }

    let mut next = context.clone();
    next.sound_obj = Some(status);
    next.is_playing = status.is_playing;
    next.playback_position = Some(status.position_millis);
    if status.duration_millis.is_some() {
        next.playback_duration = status.duration_millis;
    }
    StatusEvent::Progress(Box::new(next))
}

/// Load counter shared between the controller and its `StatusUpdates`
///
/// Bumped before every load; each subscription is tagged with the value at
/// registration time.
#[derive(Debug, Clone, Default)]
pub(crate) struct Generation(Arc<AtomicU64>);

impl Generation {
    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

type Tagged = (u64, PlaybackStatus);

/// Status updates pushed by the handle for the currently loaded track
///
/// Updates still queued from a previously loaded track are discarded on
/// receipt, so a late end-of-track from the old track never advances again.
pub struct StatusUpdates {
    rx: mpsc::UnboundedReceiver<Tagged>,
    generation: Generation,
}

impl StatusUpdates {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Tagged>, generation: Generation) -> Self {
        Self { rx, generation }
    }

    /// Next update for the current track; `None` once the controller is gone
    pub async fn recv(&mut self) -> Option<PlaybackStatus> {
        loop {
            let (generation, status) = self.rx.recv().await?;
            if let Some(status) = self.accept(generation, status) {
                return Some(status);
            }
        }
    }

    /// Like `recv`, without waiting
    pub fn try_recv(&mut self) -> Option<PlaybackStatus> {
        while let Ok((generation, status)) = self.rx.try_recv() {
            if let Some(status) = self.accept(generation, status) {
                return Some(status);
            }
        }
        None
    }

    fn accept(&self, generation: u64, status: PlaybackStatus) -> Option<PlaybackStatus> {
        if generation == self.generation.current() {
            Some(status)
        } else {
            trace!("Dropping update from load #{}", generation);
            None
        }
    }
}

/// Subscription callback forwarding every update into `tx`, tagged with
/// the load it belongs to
///
/// Updates sent after the receiver is dropped are discarded.
pub(crate) fn forwarding_callback(
    tx: mpsc::UnboundedSender<Tagged>,
    generation: u64,
) -> StatusCallback {
    Arc::new(move |status| {
        let _ = tx.send((generation, status));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Track;

    fn context() -> PlaybackContext {
        let mut context = PlaybackContext::new(vec![Track::new("a", "a.mp3")]);
        context.current_audio_index = Some(0);
        context.is_playing = true;
        context
    }

    #[test]
    fn finish_wins_over_everything() {
        let status = PlaybackStatus {
            is_loaded: true,
            is_playing: false,
            position_millis: 180_000,
            duration_millis: Some(180_000),
            did_just_finish: true,
        };
        assert_eq!(classify(&context(), status), StatusEvent::Finished);
    }

    #[test]
    fn progress_updates_position_and_duration() {
        let status = PlaybackStatus {
            is_loaded: true,
            is_playing: true,
            position_millis: 12_000,
            duration_millis: Some(180_000),
            did_just_finish: false,
        };
        let StatusEvent::Progress(next) = classify(&context(), status) else {
            panic!("expected progress");
        };
        assert_eq!(next.playback_position, Some(12_000));
        assert_eq!(next.playback_duration, Some(180_000));
        assert_eq!(next.sound_obj, Some(status));
        assert_eq!(next.current_audio_index, Some(0));
    }

    #[test]
    fn progress_keeps_duration_when_stream_reports_none() {
        let mut start = context();
        start.playback_duration = Some(90_000);
        let status = PlaybackStatus {
            is_loaded: true,
            is_playing: true,
            position_millis: 1_000,
            duration_millis: None,
            did_just_finish: false,
        };
        let StatusEvent::Progress(next) = classify(&start, status) else {
            panic!("expected progress");
        };
        assert_eq!(next.playback_duration, Some(90_000));
    }

    #[test]
    fn interruption_is_reflected_in_is_playing() {
        let status = PlaybackStatus {
            is_loaded: true,
            is_playing: false,
            position_millis: 3_000,
            duration_millis: Some(180_000),
            did_just_finish: false,
        };
        let StatusEvent::Progress(next) = classify(&context(), status) else {
            panic!("expected progress");
        };
        assert!(!next.is_playing);
    }

    #[test]
    fn unloaded_status_is_idle() {
        assert_eq!(
            classify(&context(), PlaybackStatus::unloaded()),
            StatusEvent::Idle
        );
    }

    fn at(position_millis: u64) -> PlaybackStatus {
        PlaybackStatus {
            is_loaded: true,
            position_millis,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn callback_forwards_into_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Generation::default();
        let mut updates = StatusUpdates::new(rx, generation.clone());

        let callback = forwarding_callback(tx, generation.current());
        callback(at(7));
        assert_eq!(updates.recv().await.unwrap().position_millis, 7);
    }

    #[tokio::test]
    async fn updates_from_an_older_load_are_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Generation::default();
        let mut updates = StatusUpdates::new(rx, generation.clone());

        let old = forwarding_callback(tx.clone(), generation.bump());
        old(at(1));
        old(PlaybackStatus {
            did_just_finish: true,
            ..at(2)
        });

        let new = forwarding_callback(tx, generation.bump());
        old(at(3));
        new(at(10));

        assert_eq!(updates.recv().await.unwrap().position_millis, 10);
        assert!(updates.try_recv().is_none());
    }
}
