//! Cadence Storage
//!
//! `SQLite` persistence for the last played track, per profile.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::LastPlayedStore;
//! use cadence_storage::{create_pool, run_migrations, SqliteLastPlayedStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteLastPlayedStore::new(pool, "default");
//! if let Some(last) = store.load_last_played().await? {
//!     println!("Resume {} at {:?}ms", last.track.title, last.track.last_position);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod last_played;
mod store;

pub use error::{Result, StorageError};
pub use store::SqliteLastPlayedStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the first read or write.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(
    pool: &SqlitePool,
) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("Pool created");

    Ok(pool)
}
