//! Playback controller - effect runner
//!
//! Owns the playback handle and the last-played store, asks the reducer for a
//! plan, executes its effects in order, and hands back the next context.
//! Operations take `&mut self`, so one controller only ever runs one intent
//! at a time.

use crate::{
    context::PlaybackContext,
    error::{PlaybackError, PrimitiveOp, Result},
    events::{classify, forwarding_callback, Generation, StatusEvent, StatusUpdates},
    reducer::{self, Effect, Plan, Transition},
    types::{Direction, Intent, PlayerConfig, PlaylistOverride},
};
use cadence_core::{LastPlayedStore, PlaybackPrimitive, PlaybackStatus, Track};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Drives a playback handle from user intents
///
/// - `select_audio`: play, pause, resume or switch to a picked track
/// - `change_audio`: next/previous with wraparound
/// - `move_audio`: relative seek within the current track
/// - `on_status`: status sync and auto-advance at end of track
///
/// Every operation returns the replacement context on success. On failure
/// the error is logged and returned; the caller's context stays valid.
pub struct PlaybackController<P, S> {
    primitive: P,
    store: S,
    config: PlayerConfig,
    status_tx: Option<mpsc::UnboundedSender<(u64, PlaybackStatus)>>,
    generation: Generation,
}

impl<P, S> PlaybackController<P, S>
where
    P: PlaybackPrimitive,
    S: LastPlayedStore,
{
    /// Create a controller owning `primitive`
    pub fn new(primitive: P, store: S, config: PlayerConfig) -> Self {
        Self {
            primitive,
            store,
            config,
            status_tx: None,
            generation: Generation::default(),
        }
    }

    /// Receiver for status updates pushed by the handle
    ///
    /// The forwarding subscription is (re-)registered after every load, and
    /// only updates from the latest load are delivered. Calling this again
    /// replaces the previous receiver.
    pub fn status_updates(&mut self) -> StatusUpdates {
        let (tx, rx) = mpsc::unbounded_channel();
        self.status_tx = Some(tx);
        StatusUpdates::new(rx, self.generation.clone())
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Direct access to the handle, bypassing the controller
    pub fn primitive_mut(&mut self) -> &mut P {
        &mut self.primitive
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the controller, returning the handle and the store
    pub fn into_parts(self) -> (P, S) {
        (self.primitive, self.store)
    }

    /// Initial context, pre-selecting the track stored by a previous session
    pub async fn restore_context(&self, audio_files: Vec<Track>) -> PlaybackContext {
        match self.store.load_last_played().await {
            Ok(Some(last)) => {
                debug!(
                    "Restoring last played track {} at {:?}ms",
                    last.track.id, last.track.last_position
                );
                PlaybackContext::restored(audio_files, last)
            }
            Ok(None) => PlaybackContext::new(audio_files),
            Err(e) => {
                warn!("Failed to read last played track: {}", e);
                PlaybackContext::new(audio_files)
            }
        }
    }

    /// User picked `target`
    ///
    /// Returns `Ok(None)` when the handle reports a status but has nothing
    /// loaded.
    pub async fn select_audio(
        &mut self,
        context: &PlaybackContext,
        target: &Track,
        playlist: Option<PlaylistOverride>,
    ) -> Result<Option<PlaybackContext>> {
        let result = self.try_select(context, target, playlist).await;
        log_failure("select", result)
    }

    /// Move to the neighbouring track in the library
    pub async fn change_audio(
        &mut self,
        context: &PlaybackContext,
        direction: Direction,
    ) -> Result<PlaybackContext> {
        let result = self.try_change(context, direction).await;
        log_failure("change", result)
    }

    /// Seek to `fraction` of the current track and keep playing
    ///
    /// Returns `Ok(None)` unless something is loaded and playing.
    pub async fn move_audio(
        &mut self,
        context: &PlaybackContext,
        fraction: f64,
    ) -> Result<Option<PlaybackContext>> {
        let result = self.try_seek(context, fraction).await;
        log_failure("seek", result)
    }

    /// Sync a status update pushed by the handle
    ///
    /// At end of track this advances: within the running playlist if there
    /// is one, through the library otherwise.
    pub async fn on_status(
        &mut self,
        context: &PlaybackContext,
        status: PlaybackStatus,
    ) -> Result<Option<PlaybackContext>> {
        match classify(context, status) {
            StatusEvent::Progress(next) => Ok(Some(*next)),
            StatusEvent::Idle => Ok(None),
            StatusEvent::Finished => {
                info!("Track finished, advancing");
                let result = self.try_advance(context).await;
                log_failure("auto-advance", result).map(Some)
            }
        }
    }

    /// Run any intent
    pub async fn dispatch(
        &mut self,
        context: &PlaybackContext,
        intent: Intent,
    ) -> Result<Option<PlaybackContext>> {
        match intent {
            Intent::Select { track, playlist } => {
                self.select_audio(context, &track, playlist).await
            }
            Intent::Next => self.change_audio(context, Direction::Next).await.map(Some),
            Intent::Previous => self
                .change_audio(context, Direction::Previous)
                .await
                .map(Some),
            Intent::Seek { fraction } => self.move_audio(context, fraction).await,
        }
    }

    async fn try_select(
        &mut self,
        context: &PlaybackContext,
        target: &Track,
        playlist: Option<PlaylistOverride>,
    ) -> Result<Option<PlaybackContext>> {
        match reducer::plan_select(context, target, playlist)? {
            Some(plan) => self.execute(context, plan).await.map(Some),
            None => Ok(None),
        }
    }

    async fn try_change(
        &mut self,
        context: &PlaybackContext,
        direction: Direction,
    ) -> Result<PlaybackContext> {
        let status = self
            .primitive
            .status()
            .await
            .map_err(|e| PlaybackError::primitive(PrimitiveOp::Status, e))?;
        let plan = reducer::plan_change(context, direction, status.is_loaded)?;
        self.execute(context, plan).await
    }

    async fn try_seek(
        &mut self,
        context: &PlaybackContext,
        fraction: f64,
    ) -> Result<Option<PlaybackContext>> {
        match reducer::plan_seek(context, fraction)? {
            Some(plan) => self.execute(context, plan).await.map(Some),
            None => Ok(None),
        }
    }

    async fn try_advance(&mut self, context: &PlaybackContext) -> Result<PlaybackContext> {
        match reducer::plan_playlist_advance(context)? {
            Some(plan) => self.execute(context, plan).await,
            None => self.try_change(context, Direction::Next).await,
        }
    }

    async fn execute(&mut self, context: &PlaybackContext, plan: Plan) -> Result<PlaybackContext> {
        let mut last_status = None;
        let mut seek_status = None;
        for effect in &plan.effects {
            if let Some(status) = self.run_effect(effect).await? {
                if matches!(effect, Effect::Seek { .. }) {
                    seek_status = Some(status);
                }
                last_status = Some(status);
            }
        }

        // A seek records where the seek landed, not what the resume reported
        let reported = if plan.transition.reads_seek_status() {
            seek_status.or(last_status)
        } else {
            last_status
        };
        let status = match reported {
            Some(status) => status,
            None => self
                .primitive
                .status()
                .await
                .map_err(|e| PlaybackError::primitive(PrimitiveOp::Status, e))?,
        };

        if let Transition::Start { track, index, .. } = &plan.transition {
            info!("Now playing {} ({}) at index {}", track.title, track.id, index);
        }
        if let Some((track, index)) = plan.transition.persisted(context, status) {
            self.persist(&track, index).await;
        }

        Ok(plan.transition.apply(context, status))
    }

    async fn run_effect(&mut self, effect: &Effect) -> Result<Option<PlaybackStatus>> {
        debug!("Effect: {:?}", effect);

        let status = match effect {
            Effect::Load { uri, autoplay } => {
                let generation = self.generation.bump();
                debug!("Load #{}: {}", generation, uri);
                let options = self.config.load_options(*autoplay);
                self.primitive
                    .load(uri, options)
                    .await
                    .map_err(|e| PlaybackError::primitive(PrimitiveOp::Load, e))?
            }
            Effect::Seek { position_ms } => self
                .primitive
                .seek(*position_ms)
                .await
                .map_err(|e| PlaybackError::primitive(PrimitiveOp::Seek, e))?,
            Effect::Play => self
                .primitive
                .play()
                .await
                .map_err(|e| PlaybackError::primitive(PrimitiveOp::Play, e))?,
            Effect::Pause => self
                .primitive
                .pause()
                .await
                .map_err(|e| PlaybackError::primitive(PrimitiveOp::Pause, e))?,
            Effect::Stop => {
                self.primitive
                    .stop()
                    .await
                    .map_err(|e| PlaybackError::primitive(PrimitiveOp::Stop, e))?;
                return Ok(None);
            }
            Effect::Unload => {
                self.primitive
                    .unload()
                    .await
                    .map_err(|e| PlaybackError::primitive(PrimitiveOp::Unload, e))?;
                return Ok(None);
            }
            Effect::Subscribe => {
                if let Some(tx) = &self.status_tx {
                    let callback = forwarding_callback(tx.clone(), self.generation.current());
                    self.primitive.on_status_update(callback);
                }
                return Ok(None);
            }
        };

        Ok(Some(status))
    }

    /// Best-effort write; failures never fail the operation
    async fn persist(&self, track: &Track, index: usize) {
        if let Err(e) = self.store.store_last_played(track, index).await {
            warn!("Failed to store last played track {}: {}", track.id, e);
        }
    }
}

fn log_failure<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!("Playback {} failed: {}", operation, e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadence_core::{CadenceError, LastPlayed, LoadOptions, StatusCallback};
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl LastPlayedStore for Store {
            async fn store_last_played(&self, track: &Track, index: usize) -> cadence_core::Result<()>;
            async fn load_last_played(&self) -> cadence_core::Result<Option<LastPlayed>>;
        }
    }

    /// Handle that is always loaded and playing
    #[derive(Default)]
    struct AlwaysPlaying {
        loads: Vec<String>,
    }

    fn playing() -> PlaybackStatus {
        PlaybackStatus {
            is_loaded: true,
            is_playing: true,
            position_millis: 0,
            duration_millis: Some(60_000),
            did_just_finish: false,
        }
    }

    #[async_trait]
    impl PlaybackPrimitive for AlwaysPlaying {
        async fn load(
            &mut self,
            uri: &str,
            _options: LoadOptions,
        ) -> cadence_core::Result<PlaybackStatus> {
            self.loads.push(uri.to_string());
            Ok(playing())
        }
        async fn play(&mut self) -> cadence_core::Result<PlaybackStatus> {
            Ok(playing())
        }
        async fn pause(&mut self) -> cadence_core::Result<PlaybackStatus> {
            Err(CadenceError::audio("pause unsupported"))
        }
        async fn seek(&mut self, position_ms: u64) -> cadence_core::Result<PlaybackStatus> {
            Ok(PlaybackStatus {
                position_millis: position_ms,
                ..playing()
            })
        }
        async fn stop(&mut self) -> cadence_core::Result<()> {
            Ok(())
        }
        async fn unload(&mut self) -> cadence_core::Result<()> {
            Ok(())
        }
        async fn status(&mut self) -> cadence_core::Result<PlaybackStatus> {
            Ok(playing())
        }
        fn on_status_update(&mut self, _callback: StatusCallback) {}
    }

    fn library() -> Vec<Track> {
        vec![Track::new("a", "a.mp3"), Track::new("b", "b.mp3")]
    }

    #[tokio::test]
    async fn store_failure_does_not_fail_select() {
        let mut store = MockStore::new();
        store
            .expect_store_last_played()
            .withf(|track, index| track.id.as_str() == "b" && *index == 1)
            .times(1)
            .returning(|_, _| Err(CadenceError::storage("disk full")));

        let mut controller =
            PlaybackController::new(AlwaysPlaying::default(), store, PlayerConfig::default());
        let context = PlaybackContext::new(library());

        let next = controller
            .select_audio(&context, &context.audio_files[1], None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.current_audio_index, Some(1));
        assert!(next.is_playing);
    }

    #[tokio::test]
    async fn failed_pause_reports_operation() {
        let mut store = MockStore::new();
        store.expect_store_last_played().returning(|_, _| Ok(()));

        let mut controller =
            PlaybackController::new(AlwaysPlaying::default(), store, PlayerConfig::default());
        let context = PlaybackContext::new(library());
        let playing_context = controller
            .select_audio(&context, &context.audio_files[0], None)
            .await
            .unwrap()
            .unwrap();

        let err = controller
            .select_audio(&playing_context, &playing_context.audio_files[0], None)
            .await
            .unwrap_err();
        assert_eq!(err.operation(), Some(PrimitiveOp::Pause));
    }

    #[tokio::test]
    async fn restore_falls_back_on_store_error() {
        let mut store = MockStore::new();
        store
            .expect_load_last_played()
            .returning(|| Err(CadenceError::storage("locked")));

        let controller =
            PlaybackController::new(AlwaysPlaying::default(), store, PlayerConfig::default());
        let context = controller.restore_context(library()).await;
        assert!(context.current_audio.is_none());
        assert_eq!(context.total_audio_count(), 2);
    }

    #[tokio::test]
    async fn restore_preselects_stored_track() {
        let mut store = MockStore::new();
        store.expect_load_last_played().returning(|| {
            Ok(Some(LastPlayed::new(
                Track::new("b", "b.mp3").with_last_position(30_000),
                1,
            )))
        });

        let controller =
            PlaybackController::new(AlwaysPlaying::default(), store, PlayerConfig::default());
        let context = controller.restore_context(library()).await;
        assert_eq!(context.current_audio_index, Some(1));
        assert!(context.sound_obj.is_none());
    }
}
