use thiserror::Error;

pub type DestinationResult<T> = Result<T, DestinationError>;

#[derive(Error, Debug)]
pub enum DestinationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings source error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Command sink error: {0}")]
    Sink(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
