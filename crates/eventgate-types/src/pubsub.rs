//! Publisher and subscriber bindings between functions and topics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{FunctionId, PublisherId, SubscriberId, TopicId};

/// Which end of a function a publisher binding attaches to.
///
/// The configuration store does not validate the tag, so any other string decodes into
/// [`FunctionEnd::Unrecognized`] instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionEnd {
    /// The function consumes events from the topic.
    Input,
    /// The function produces events to the topic.
    Output,
    Unrecognized(String),
}

impl FunctionEnd {
    pub fn as_str(&self) -> &str {
        match self {
            FunctionEnd::Input => "input",
            FunctionEnd::Output => "output",
            FunctionEnd::Unrecognized(value) => value,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, FunctionEnd::Unrecognized(_))
    }
}

impl From<String> for FunctionEnd {
    fn from(value: String) -> Self {
        match value.as_str() {
            "input" => FunctionEnd::Input,
            "output" => FunctionEnd::Output,
            _ => FunctionEnd::Unrecognized(value),
        }
    }
}

impl From<FunctionEnd> for String {
    fn from(value: FunctionEnd) -> Self {
        match value {
            FunctionEnd::Unrecognized(value) => value,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for FunctionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a function end to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<PublisherId>,
    pub topic_id: TopicId,
    pub function_id: FunctionId,
    pub function_end: FunctionEnd,
}

/// Declares that a function receives events published to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<SubscriberId>,
    pub topic_id: TopicId,
    pub function_id: FunctionId,
}
