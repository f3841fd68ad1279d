/// Cadence - headless player with a simulated transport
mod config;
mod error;
mod repl;
mod virtual_transport;

use crate::config::AppConfig;
use anyhow::Context;
use cadence_core::{LastPlayedStore, Track};
use cadence_playback::PlaybackController;
use cadence_storage::SqliteLastPlayedStore;
use clap::{Parser, Subcommand};
use repl::Session;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use virtual_transport::VirtualTransport;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence audio player (simulated output)", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a library of URIs interactively
    Play {
        /// Track URIs, in library order
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Show the last played track
    Last,
    /// Forget the last played track
    Forget,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence=info,cadence_playback=info,cadence_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let store = open_store(&config).await?;

    match cli.command {
        Commands::Play { uris } => play(config, store, uris).await?,
        Commands::Last => show_last(&store).await?,
        Commands::Forget => forget(&store).await?,
    }

    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<SqliteLastPlayedStore> {
    let url = &config.storage.database_url;
    if let Some(parent) = sqlite_parent_dir(url) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    let pool = cadence_storage::create_pool(url)
        .await
        .with_context(|| format!("Failed to open database {url}"))?;
    cadence_storage::run_migrations(&pool).await?;
    tracing::debug!("Database ready");

    Ok(SqliteLastPlayedStore::new(pool, config.storage.profile_id.clone()))
}

async fn play(
    config: AppConfig,
    store: SqliteLastPlayedStore,
    uris: Vec<String>,
) -> anyhow::Result<()> {
    let track_ms = config.library.default_track_secs * 1000;
    let library = build_library(&uris, track_ms);
    tracing::info!("Library has {} tracks", library.len());

    let mut controller =
        PlaybackController::new(VirtualTransport::new(track_ms), store, config.player);
    let status_rx = controller.status_updates();
    let context = controller.restore_context(library).await;

    if context.current_audio.is_some() {
        println!(
            "Last session: {} ('toggle' resumes)",
            repl::render_status(&context)
        );
    }

    Session::new(controller, status_rx, context).run().await
}

/// Library tracks keyed by URI, so a stored track matches across runs
fn build_library(uris: &[String], track_ms: u64) -> Vec<Track> {
    uris.iter()
        .map(|uri| Track::new(uri.as_str(), uri.as_str()).with_duration_ms(track_ms))
        .collect()
}

async fn show_last(store: &SqliteLastPlayedStore) -> anyhow::Result<()> {
    match store.load_last_played().await? {
        Some(last) => {
            let position = last.track.resume_position().unwrap_or(0) / 1000;
            println!(
                "{} (#{}) at {}:{:02}",
                last.track.uri,
                last.index + 1,
                position / 60,
                position % 60
            );
        }
        None => println!("Nothing played yet for profile '{}'", store.profile_id()),
    }
    Ok(())
}

async fn forget(store: &SqliteLastPlayedStore) -> anyhow::Result<()> {
    if store.clear().await? {
        println!("Forgot last played track");
    } else {
        println!("Nothing to forget");
    }
    Ok(())
}

/// Directory holding a file-backed `SQLite` database, if any
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_of_file_urls() {
        assert_eq!(
            sqlite_parent_dir("sqlite://./data/cadence.db"),
            Some(Path::new("./data"))
        );
        assert_eq!(
            sqlite_parent_dir("sqlite:///var/lib/cadence/db.sqlite?mode=rwc"),
            Some(Path::new("/var/lib/cadence"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://cadence.db"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/db"), None);
    }

    #[test]
    fn library_tracks_are_keyed_by_uri() {
        let uris = vec![
            "file:///music/a.mp3".to_string(),
            "file:///music/b.mp3".to_string(),
        ];
        let library = build_library(&uris, 180_000);
        assert_eq!(library[1].id.as_str(), "file:///music/b.mp3");
        assert_eq!(library[1].title, "b.mp3");
        assert_eq!(library[0].duration_ms, Some(180_000));
    }

    #[test]
    fn cli_parses_play() {
        let cli = Cli::try_parse_from(["cadence", "play", "a.mp3", "b.mp3"]).unwrap();
        match cli.command {
            Commands::Play { uris } => assert_eq!(uris, vec!["a.mp3", "b.mp3"]),
            _ => panic!("expected play"),
        }
        assert!(Cli::try_parse_from(["cadence", "play"]).is_err());
    }
}
