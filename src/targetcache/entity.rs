//! Single-map caches for functions and endpoints.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use eventgate_types::{Endpoint, EndpointId, EntityKind, Function, FunctionId};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::error::CacheError;
use super::lock;
use super::maintainer::Cache;
use super::sink::ErrorSink;

/// A record kind stored as-is under its notification key.
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Ord + Clone + Borrow<str> + From<String> + Send + Sync + 'static;

    const KIND: EntityKind;
}

impl Entity for Function {
    type Id = FunctionId;

    const KIND: EntityKind = EntityKind::Function;
}

impl Entity for Endpoint {
    type Id = EndpointId;

    const KIND: EntityKind = EntityKind::Endpoint;
}

pub type FunctionCache = EntityCache<Function>;
pub type EndpointCache = EntityCache<Endpoint>;

/// Maps an identifier to the latest successfully decoded value.
///
/// An undecodable update is reported and dropped; the previous value stays in place.
pub struct EntityCache<T: Entity> {
    entries: RwLock<HashMap<T::Id, T>>,
    sink: Arc<dyn ErrorSink>,
}

impl<T: Entity> EntityCache<T> {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sink,
        }
    }

    pub fn get<Q>(&self, id: &Q) -> Option<T>
    where
        T::Id: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        lock::read(&self.entries, T::KIND.as_str(), "get")
            .get(id)
            .cloned()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        T::Id: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        lock::read(&self.entries, T::KIND.as_str(), "contains").contains_key(id)
    }

    pub fn len(&self) -> usize {
        lock::read(&self.entries, T::KIND.as_str(), "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against the entries while holding the read lock.
    pub fn with_entries<R>(&self, f: impl FnOnce(&HashMap<T::Id, T>) -> R) -> R {
        f(&lock::read(&self.entries, T::KIND.as_str(), "with_entries"))
    }

    pub fn snapshot(&self) -> BTreeMap<T::Id, T> {
        self.with_entries(|entries| {
            entries
                .iter()
                .map(|(id, value)| (id.clone(), value.clone()))
                .collect()
        })
    }
}

impl<T: Entity> Cache for EntityCache<T> {
    fn set(&self, key: &str, value: &[u8]) {
        let decoded = match serde_json::from_slice::<T>(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.sink.report(CacheError::decode(T::KIND, key, err));
                return;
            }
        };

        lock::write(&self.entries, T::KIND.as_str(), "set")
            .insert(T::Id::from(key.to_owned()), decoded);
        trace!(kind = T::KIND.as_str(), key, "Target cache entry stored");
    }

    fn del(&self, key: &str, _value: &[u8]) {
        let removed = lock::write(&self.entries, T::KIND.as_str(), "del")
            .remove(key)
            .is_some();
        trace!(kind = T::KIND.as_str(), key, removed, "Target cache entry deleted");
    }
}

#[cfg(test)]
mod tests {
    use eventgate_types::Provider;

    use super::*;
    use crate::targetcache::sink::RecordingSink;

    fn http_function(id: &str, url: &str) -> Vec<u8> {
        serde_json::to_vec(&Function {
            id: FunctionId::from(id),
            provider: Provider::Http {
                url: url.to_string(),
            },
        })
        .unwrap()
    }

    fn cache() -> (FunctionCache, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        (FunctionCache::new(sink.clone()), sink)
    }

    #[test]
    fn set_then_get_returns_decoded_value() {
        let (cache, sink) = cache();

        cache.set("fn1", &http_function("fn1", "http://a"));

        let function = cache.get("fn1").expect("function stored");
        assert_eq!(
            function.provider,
            Provider::Http {
                url: "http://a".to_string()
            }
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn entries_are_keyed_by_notification_key() {
        let (cache, _) = cache();

        cache.set("store-key", &http_function("payload-id", "http://a"));

        assert!(cache.contains("store-key"));
        assert!(!cache.contains("payload-id"));
    }

    #[test]
    fn set_replaces_previous_value() {
        let (cache, _) = cache();

        cache.set("fn1", &http_function("fn1", "http://a"));
        cache.set("fn1", &http_function("fn1", "http://b"));

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&FunctionId::from("fn1")).unwrap().provider,
            Provider::Http {
                url: "http://b".to_string()
            }
        );
    }

    #[test]
    fn malformed_update_keeps_previous_value() {
        let (cache, sink) = cache();
        cache.set("fn1", &http_function("fn1", "http://a"));

        cache.set("fn1", b"{\"functionId\": ");

        assert!(cache.get("fn1").is_some());
        let errors = sink.take();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key(), "fn1");
        assert_eq!(errors[0].kind(), EntityKind::Function);
    }

    #[test]
    fn delete_ignores_payload_and_is_idempotent() {
        let (cache, sink) = cache();
        cache.set("fn1", &http_function("fn1", "http://a"));

        cache.del("fn1", b"garbage");
        cache.del("fn1", b"garbage");

        assert!(cache.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn endpoint_cache_uses_endpoint_records() {
        let sink = Arc::new(RecordingSink::new());
        let cache = EndpointCache::new(sink.clone());

        cache.set(
            "ep1",
            br#"{"functionId": "fn1", "method": "GET", "path": "/users/:id"}"#,
        );
        cache.set("ep2", br#"{"functionId": "fn1"}"#);

        let endpoint = cache.get("ep1").expect("endpoint stored");
        assert_eq!(endpoint.path, "/users/:id");
        assert!(!cache.contains("ep2"));
        assert_eq!(sink.take()[0].kind(), EntityKind::Endpoint);
    }
}
