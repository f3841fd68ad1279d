/// CLI errors
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable interactive command
    #[error("{0}")]
    Command(String),

    #[error("No track at position {0}")]
    NoSuchTrack(usize),

    #[error("Nothing selected")]
    NothingSelected,
}

impl CliError {
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}
