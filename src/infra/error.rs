use thiserror::Error;

use crate::config::LoadError;
use crate::feed::FeedError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {0}")]
    Configuration(#[from] LoadError),
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("feed worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("output error: {message}")]
    Output { message: String },
}

impl InfraError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}
