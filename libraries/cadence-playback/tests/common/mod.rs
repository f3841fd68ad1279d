//! Shared test doubles for controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_core::{
    CadenceError, LastPlayed, LastPlayedStore, LoadOptions, PlaybackPrimitive, PlaybackStatus,
    StatusCallback, Track,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub const DEFAULT_DURATION_MS: u64 = 200_000;

/// Calls received by the recording handle, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load { uri: String, autoplay: bool },
    Play,
    Pause,
    Seek(u64),
    Stop,
    Unload,
    Status,
}

/// In-memory playback handle that records every call
///
/// Behaves like a mobile media player: loading drops the status
/// subscription, seeking pauses, and playing at the end rewinds.
#[derive(Default)]
pub struct RecordingPrimitive {
    pub calls: Vec<Call>,
    pub loaded: Option<String>,
    pub playing: bool,
    pub position: u64,
    pub durations: HashMap<String, u64>,
    pub fail_on: Option<&'static str>,
    pub subscriptions: usize,
    callback: Option<StatusCallback>,
}

impl RecordingPrimitive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call named `op` fail
    pub fn failing_on(op: &'static str) -> Self {
        Self {
            fail_on: Some(op),
            ..Self::default()
        }
    }

    /// Calls excluding status queries
    pub fn transport_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| **call != Call::Status)
            .cloned()
            .collect()
    }

    /// Push a status through the registered subscription
    pub fn emit(&self, status: PlaybackStatus) -> bool {
        match &self.callback {
            Some(callback) => {
                callback(status);
                true
            }
            None => false,
        }
    }

    fn check(&self, op: &'static str) -> cadence_core::Result<()> {
        if self.fail_on == Some(op) {
            return Err(CadenceError::audio(format!("{op} rejected")));
        }
        Ok(())
    }

    fn snapshot(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_loaded: self.loaded.is_some(),
            is_playing: self.playing,
            position_millis: self.position,
            duration_millis: self.loaded.as_ref().map(|uri| {
                self.durations
                    .get(uri)
                    .copied()
                    .unwrap_or(DEFAULT_DURATION_MS)
            }),
            did_just_finish: false,
        }
    }

    fn require_loaded(&self) -> cadence_core::Result<()> {
        if self.loaded.is_none() {
            return Err(CadenceError::audio("nothing loaded"));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaybackPrimitive for RecordingPrimitive {
    async fn load(
        &mut self,
        uri: &str,
        options: LoadOptions,
    ) -> cadence_core::Result<PlaybackStatus> {
        self.calls.push(Call::Load {
            uri: uri.to_string(),
            autoplay: options.autoplay,
        });
        self.check("load")?;
        if self.loaded.is_some() {
            return Err(CadenceError::audio("already loaded"));
        }
        self.loaded = Some(uri.to_string());
        self.playing = options.autoplay;
        self.position = 0;
        self.callback = None;
        Ok(self.snapshot())
    }

    async fn play(&mut self) -> cadence_core::Result<PlaybackStatus> {
        self.calls.push(Call::Play);
        self.check("play")?;
        self.require_loaded()?;
        // Playing a finished sound starts it over
        if self.snapshot().duration_millis.is_some_and(|d| self.position >= d) {
            self.position = 0;
        }
        self.playing = true;
        Ok(self.snapshot())
    }

    async fn pause(&mut self) -> cadence_core::Result<PlaybackStatus> {
        self.calls.push(Call::Pause);
        self.check("pause")?;
        self.require_loaded()?;
        self.playing = false;
        Ok(self.snapshot())
    }

    async fn seek(&mut self, position_ms: u64) -> cadence_core::Result<PlaybackStatus> {
        self.calls.push(Call::Seek(position_ms));
        self.check("seek")?;
        self.require_loaded()?;
        self.position = position_ms;
        self.playing = false;
        Ok(self.snapshot())
    }

    async fn stop(&mut self) -> cadence_core::Result<()> {
        self.calls.push(Call::Stop);
        self.check("stop")?;
        self.playing = false;
        self.position = 0;
        Ok(())
    }

    async fn unload(&mut self) -> cadence_core::Result<()> {
        self.calls.push(Call::Unload);
        self.check("unload")?;
        self.loaded = None;
        self.playing = false;
        self.callback = None;
        Ok(())
    }

    async fn status(&mut self) -> cadence_core::Result<PlaybackStatus> {
        self.calls.push(Call::Status);
        self.check("status")?;
        Ok(self.snapshot())
    }

    fn on_status_update(&mut self, callback: StatusCallback) {
        self.subscriptions += 1;
        self.callback = Some(callback);
    }
}

/// Last-played store keeping every write
#[derive(Default)]
pub struct MemoryStore {
    pub writes: Mutex<Vec<(Track, usize)>>,
}

impl MemoryStore {
    pub fn last_write(&self) -> Option<(Track, usize)> {
        self.writes.lock().unwrap().last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl LastPlayedStore for MemoryStore {
    async fn store_last_played(&self, track: &Track, index: usize) -> cadence_core::Result<()> {
        self.writes.lock().unwrap().push((track.clone(), index));
        Ok(())
    }

    async fn load_last_played(&self) -> cadence_core::Result<Option<LastPlayed>> {
        Ok(self
            .last_write()
            .map(|(track, index)| LastPlayed::new(track, index)))
    }
}

pub fn abc_library() -> Vec<Track> {
    vec![
        Track::new("a", "file:///music/a.mp3"),
        Track::new("b", "file:///music/b.mp3"),
        Track::new("c", "file:///music/c.mp3"),
    ]
}
