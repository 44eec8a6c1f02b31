use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot resolve host {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("Ping error: {0}")]
    Ping(#[from] surge_ping::SurgeError),

    #[error("Probe channel closed")]
    ProbeClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
