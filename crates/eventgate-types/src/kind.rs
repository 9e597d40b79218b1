use std::fmt;

use serde::{Deserialize, Serialize};

/// The four record kinds mirrored from the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Endpoint,
    Publisher,
    Subscriber,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Function,
        EntityKind::Endpoint,
        EntityKind::Publisher,
        EntityKind::Subscriber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Function => "function",
            EntityKind::Endpoint => "endpoint",
            EntityKind::Publisher => "publisher",
            EntityKind::Subscriber => "subscriber",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
