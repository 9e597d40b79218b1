//! Side channel for update failures.

use std::sync::Mutex;

use metrics::counter;
use tracing::error;

use super::error::CacheError;

const METRIC_TARGETCACHE_ERRORS: &str = "eventgate_targetcache_errors_total";

/// Receives every update a cache could not (fully) apply.
///
/// Implementations must not block: they run on the notification path, after the cache has
/// released its lock.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: CacheError);
}

/// Logs failures through `tracing` and counts them in `eventgate_targetcache_errors_total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, error: CacheError) {
        let kind = error.kind().as_str();
        let label = error.label();

        error!(
            kind,
            key = error.key(),
            error_kind = label,
            error = %error,
            "Target cache update rejected"
        );

        counter!(METRIC_TARGETCACHE_ERRORS, "kind" => kind, "error" => label).increment(1);
    }
}

/// Keeps reported failures in memory until taken.
#[derive(Debug, Default)]
pub struct RecordingSink {
    errors: Mutex<Vec<CacheError>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything reported so far.
    pub fn take(&self) -> Vec<CacheError> {
        std::mem::take(&mut *self.errors())
    }

    pub fn len(&self) -> usize {
        self.errors().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn errors(&self) -> std::sync::MutexGuard<'_, Vec<CacheError>> {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, error: CacheError) {
        self.errors().push(error);
    }
}
