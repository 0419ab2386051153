use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum WattsonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("charge limit control is not supported on this hardware")]
    Unsupported,

    #[error("charge limit {0} is outside the allowed range 20-100")]
    InvalidRange(i64),

    #[error("failed to write charge limit: {0}")]
    WriteFailed(String),
}

pub type Result<T, E = WattsonError> = std::result::Result<T, E>;
