//! Last played track per profile

use crate::error::{Result, StorageError};
use cadence_core::{LastPlayed, Track};
use sqlx::{Row, SqlitePool};

/// Get the last played track for a profile
///
/// Returns `None` if nothing was stored yet.
pub async fn get(pool: &SqlitePool, profile_id: &str) -> Result<Option<LastPlayed>> {
    let row = sqlx::query(
        "SELECT track_json, track_index, updated_at
         FROM last_played WHERE profile_id = ?",
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let track_json: String = row.try_get("track_json")?;
    let track_index: i64 = row.try_get("track_index")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    let track: Track = serde_json::from_str(&track_json)?;
    let index = usize::try_from(track_index)
        .map_err(|_| StorageError::corrupt(profile_id, format!("negative index {track_index}")))?;

    Ok(Some(LastPlayed {
        track,
        index,
        updated_at,
    }))
}

/// Create or replace the last played track for a profile
pub async fn save(pool: &SqlitePool, profile_id: &str, track: &Track, index: usize) -> Result<()> {
    let track_json = serde_json::to_string(track)?;
    let track_index = i64::try_from(index)
        .map_err(|_| StorageError::corrupt(profile_id, format!("index {index} out of range")))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO last_played (profile_id, track_id, track_json, track_index, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(profile_id)
         DO UPDATE SET
            track_id = excluded.track_id,
            track_json = excluded.track_json,
            track_index = excluded.track_index,
            updated_at = excluded.updated_at",
    )
    .bind(profile_id)
    .bind(track.id.as_str())
    .bind(track_json)
    .bind(track_index)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the stored track for a profile
///
/// Returns whether a row was removed.
pub async fn clear(pool: &SqlitePool, profile_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM last_played WHERE profile_id = ?")
        .bind(profile_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
