/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Row key for the last played track
    #[serde(default = "default_profile_id")]
    pub profile_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Length of every simulated track, in seconds
    #[serde(default = "default_track_secs")]
    pub default_track_secs: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given. Without it, `cadence.toml` in the
    /// working directory is used if present. `CADENCE_*` variables override
    /// both (e.g. `CADENCE_STORAGE__PROFILE_ID`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.default_track_secs == 0 {
            return Err(CliError::Config(
                "library.default_track_secs must be positive".to_string(),
            ));
        }
        if self.player.progress_update_interval_ms == 0 {
            return Err(CliError::Config(
                "player.progress_update_interval_ms must be positive".to_string(),
            ));
        }
        if self.storage.profile_id.is_empty() {
            return Err(CliError::Config(
                "storage.profile_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_profile_id() -> String {
    "default".to_string()
}

fn default_track_secs() -> u64 {
    180
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            profile_id: default_profile_id(),
        }
    }
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            default_track_secs: default_track_secs(),
        }
    }
}
