use crate::last_played;
use async_trait::async_trait;
use cadence_core::{LastPlayed, LastPlayedStore, Result, Track};
use sqlx::SqlitePool;

/// `SQLite`-backed last played store for a single profile
#[derive(Clone)]
pub struct SqliteLastPlayedStore {
    pool: SqlitePool,
    profile_id: String,
}

impl SqliteLastPlayedStore {
    pub fn new(pool: SqlitePool, profile_id: impl Into<String>) -> Self {
        Self {
            pool,
            profile_id: profile_id.into(),
        }
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Forget the stored track
    pub async fn clear(&self) -> Result<bool> {
        last_played::clear(&self.pool, &self.profile_id)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl LastPlayedStore for SqliteLastPlayedStore {
    async fn store_last_played(&self, track: &Track, index: usize) -> Result<()> {
        last_played::save(&self.pool, &self.profile_id, track, index)
            .await
            .map_err(Into::into)
    }

    async fn load_last_played(&self) -> Result<Option<LastPlayed>> {
        last_played::get(&self.pool, &self.profile_id)
            .await
            .map_err(Into::into)
    }
}
