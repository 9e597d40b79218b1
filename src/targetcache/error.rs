use eventgate_types::EntityKind;
use thiserror::Error;

/// A rejected or partially applied cache update.
///
/// These never travel back to the notification source; caches hand them to an
/// [`ErrorSink`](super::ErrorSink) and keep processing the stream.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not deserialize {kind} state for key `{key}`: {source}")]
    Decode {
        kind: EntityKind,
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("publisher `{key}` has an invalid function end `{function_end}`")]
    InvalidFunctionEnd { key: String, function_end: String },
}

impl CacheError {
    pub fn decode(kind: EntityKind, key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            kind,
            key: key.into(),
            source,
        }
    }

    pub fn invalid_function_end(key: impl Into<String>, function_end: impl Into<String>) -> Self {
        Self::InvalidFunctionEnd {
            key: key.into(),
            function_end: function_end.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            CacheError::Decode { kind, .. } => *kind,
            CacheError::InvalidFunctionEnd { .. } => EntityKind::Publisher,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CacheError::Decode { key, .. } | CacheError::InvalidFunctionEnd { key, .. } => key,
        }
    }

    /// Short machine-readable label, used as a metric dimension.
    pub fn label(&self) -> &'static str {
        match self {
            CacheError::Decode { .. } => "decode",
            CacheError::InvalidFunctionEnd { .. } => "invalid_function_end",
        }
    }
}
