use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum UpsError {
    #[error("config error: {0}")]
    Config(String),

    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("power control error: {0}")]
    Power(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = UpsError> = std::result::Result<T, E>;
