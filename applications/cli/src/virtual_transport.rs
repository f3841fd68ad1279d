//! Simulated playback handle
//!
//! Behaves like a mobile media player without producing sound: one sound
//! at a time, position advanced by a ticker task, progress pushed through
//! the registered callback and a final `did_just_finish` update at the
//! end of the track. Loading drops the previous subscription.

use async_trait::async_trait;
use cadence_core::{
    CadenceError, LoadOptions, PlaybackPrimitive, PlaybackStatus, Result, StatusCallback,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Default)]
struct Shared {
    loaded: Option<String>,
    playing: bool,
    position_ms: u64,
    duration_ms: u64,
    callback: Option<StatusCallback>,
}

impl Shared {
    fn status(&self) -> PlaybackStatus {
        if self.loaded.is_none() {
            return PlaybackStatus::unloaded();
        }
        PlaybackStatus {
            is_loaded: true,
            is_playing: self.playing,
            position_millis: self.position_ms,
            duration_millis: Some(self.duration_ms),
            did_just_finish: false,
        }
    }

    /// Advance by `elapsed_ms` while playing
    ///
    /// Returns the update to push, if any.
    fn advance(&mut self, elapsed_ms: u64) -> Option<PlaybackStatus> {
        if self.loaded.is_none() || !self.playing {
            return None;
        }

        self.position_ms = (self.position_ms + elapsed_ms).min(self.duration_ms);
        let mut status = self.status();
        if self.position_ms >= self.duration_ms {
            self.playing = false;
            status.is_playing = false;
            status.did_just_finish = true;
        }
        Some(status)
    }
}

/// Playback handle that only keeps time
pub struct VirtualTransport {
    shared: Arc<Mutex<Shared>>,
    track_ms: u64,
    ticker: Option<JoinHandle<()>>,
}

impl VirtualTransport {
    /// Every loaded track lasts `track_ms`
    pub fn new(track_ms: u64) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            track_ms,
            ticker: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_loaded(&self) -> Result<MutexGuard<'_, Shared>> {
        let shared = self.lock();
        if shared.loaded.is_none() {
            return Err(CadenceError::audio("no sound loaded"));
        }
        Ok(shared)
    }

    fn start_ticker(&mut self, interval_ms: u64) {
        self.stop_ticker();

        let shared = Arc::clone(&self.shared);
        let period = Duration::from_millis(interval_ms.max(1));
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let update = {
                    let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    shared
                        .advance(interval_ms)
                        .zip(shared.callback.clone())
                };
                if let Some((status, callback)) = update {
                    trace!("Tick at {}ms", status.position_millis);
                    callback(status);
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for VirtualTransport {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[async_trait]
impl PlaybackPrimitive for VirtualTransport {
    async fn load(&mut self, uri: &str, options: LoadOptions) -> Result<PlaybackStatus> {
        if uri.trim().is_empty() {
            return Err(CadenceError::invalid_input("cannot load an empty URI"));
        }
        let status = {
            let mut shared = self.lock();
            if let Some(current) = &shared.loaded {
                return Err(CadenceError::audio(format!(
                    "{} is already loaded, unload it first",
                    current
                )));
            }
            *shared = Shared {
                loaded: Some(uri.to_string()),
                playing: options.autoplay,
                position_ms: 0,
                duration_ms: self.track_ms,
                callback: None,
            };
            shared.status()
        };

        debug!("Loaded {} (autoplay: {})", uri, options.autoplay);
        self.start_ticker(options.progress_update_interval_ms);
        Ok(status)
    }

    async fn play(&mut self) -> Result<PlaybackStatus> {
        let mut shared = self.require_loaded()?;
        if shared.position_ms >= shared.duration_ms {
            shared.position_ms = 0;
        }
        shared.playing = true;
        Ok(shared.status())
    }

    async fn pause(&mut self) -> Result<PlaybackStatus> {
        let mut shared = self.require_loaded()?;
        shared.playing = false;
        Ok(shared.status())
    }

    async fn seek(&mut self, position_ms: u64) -> Result<PlaybackStatus> {
        let mut shared = self.require_loaded()?;
        shared.position_ms = position_ms.min(shared.duration_ms);
        // Seeking interrupts playback
        shared.playing = false;
        Ok(shared.status())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut shared = self.lock();
        shared.playing = false;
        shared.position_ms = 0;
        Ok(())
    }

    async fn unload(&mut self) -> Result<()> {
        self.stop_ticker();
        *self.lock() = Shared::default();
        Ok(())
    }

    async fn status(&mut self) -> Result<PlaybackStatus> {
        Ok(self.lock().status())
    }

    fn on_status_update(&mut self, callback: StatusCallback) {
        self.lock().callback = Some(callback);
    }
}
