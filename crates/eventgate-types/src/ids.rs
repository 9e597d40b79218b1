//! Opaque identifiers, one type per record kind.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies a registered function.
    FunctionId
);
string_id!(
    /// Identifies an HTTP endpoint.
    EndpointId
);
string_id!(
    /// Identifies a publisher binding.
    PublisherId
);
string_id!(
    /// Identifies a subscriber binding.
    SubscriberId
);
string_id!(
    /// Identifies a pub/sub topic.
    TopicId
);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = FunctionId::new("fn-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"fn-1\"");

        let parsed: TopicId = serde_json::from_str("\"orders\"").unwrap();
        assert_eq!(parsed.as_str(), "orders");
    }

    #[test]
    fn maps_keyed_by_id_accept_str_lookups() {
        let mut map = HashMap::new();
        map.insert(EndpointId::from("ep-1"), 1);

        assert_eq!(map.get("ep-1"), Some(&1));
        assert_eq!(map.get("ep-2"), None);
    }
}
