use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed feed record: {0}")]
    Record(#[from] serde_json::Error),
    #[error("feed worker stopped before the feed was drained")]
    WorkerStopped,
}
