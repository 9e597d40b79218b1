use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use eventgate_types::EntityKind;
use serde::{Deserialize, Serialize};

use super::error::FeedError;
use crate::targetcache::Reactive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Created,
    Modified,
    Deleted,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Created => "created",
            Operation::Modified => "modified",
            Operation::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One change to one record in the configuration store.
///
/// For a deletion `value` is the last value the store knew, which may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: EntityKind,
    pub operation: Operation,
    pub key: String,
    pub value: Bytes,
}

impl Notification {
    pub fn created(kind: EntityKind, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self::new(kind, Operation::Created, key, value)
    }

    pub fn modified(kind: EntityKind, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self::new(kind, Operation::Modified, key, value)
    }

    pub fn deleted(kind: EntityKind, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self::new(kind, Operation::Deleted, key, value)
    }

    fn new(
        kind: EntityKind,
        operation: Operation,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            kind,
            operation,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Deliver this notification to `reactive`.
    pub fn apply(&self, reactive: &dyn Reactive) {
        match self.operation {
            Operation::Created => reactive.created(&self.key, &self.value),
            Operation::Modified => reactive.modified(&self.key, &self.value),
            Operation::Deleted => reactive.deleted(&self.key, &self.value),
        }
    }
}

/// Recorded form of a notification: one JSON object per feed line.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    kind: EntityKind,
    op: Operation,
    key: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl FromStr for Notification {
    type Err = FeedError;

    /// A string `value` is taken verbatim as the payload bytes, so recordings can carry
    /// payloads that are not valid JSON. Any other value is re-encoded.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let record: FeedRecord = serde_json::from_str(line)?;
        let value = match record.value {
            None => Bytes::new(),
            Some(serde_json::Value::String(raw)) => Bytes::from(raw),
            Some(other) => Bytes::from(serde_json::to_vec(&other)?),
        };

        Ok(Self::new(record.kind, record.op, record.key, value))
    }
}
