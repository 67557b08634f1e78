use thiserror::Error;

/// Top-level error type for Butler.
#[derive(Debug, Error)]
pub enum ButlerError {
    /// Persistent storage failure (unavailable database, constraint violation).
    #[error("storage error: {0}")]
    Storage(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Error from the weather data provider.
    #[error("weather error: {0}")]
    Weather(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
