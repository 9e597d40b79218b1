//! Topic to subscribing-function index.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use eventgate_types::{EntityKind, FunctionId, Subscriber, TopicId};
use tracing::trace;

use super::error::CacheError;
use super::lock;
use super::maintainer::Cache;
use super::multimap::SetMultiMap;
use super::sink::ErrorSink;

const CACHE: &str = "subscriber";

/// Indexes subscriber bindings by topic.
///
/// Unlike [`PublisherCache`](super::PublisherCache) no binding is retained: deletions are
/// resolved from the payload that arrives with the deletion notification, so a topic change
/// for an existing subscription has to come through as a delete followed by a set.
pub struct SubscriberCache {
    topics: RwLock<SetMultiMap<TopicId, FunctionId>>,
    sink: Arc<dyn ErrorSink>,
}

impl SubscriberCache {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            topics: RwLock::new(SetMultiMap::new()),
            sink,
        }
    }

    /// Functions subscribed to `topic`. Empty when there are none.
    pub fn subscribers(&self, topic: &str) -> HashSet<FunctionId> {
        lock::read(&self.topics, CACHE, "subscribers")
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, topic: &str, function: &str) -> bool {
        lock::read(&self.topics, CACHE, "is_subscribed").contains(topic, function)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        lock::read(&self.topics, CACHE, "topic_count").len()
    }

    pub fn snapshot(&self) -> BTreeMap<TopicId, BTreeSet<FunctionId>> {
        lock::read(&self.topics, CACHE, "snapshot").to_ordered()
    }

    fn decode(&self, key: &str, value: &[u8]) -> Option<Subscriber> {
        serde_json::from_slice::<Subscriber>(value)
            .map_err(|err| {
                self.sink
                    .report(CacheError::decode(EntityKind::Subscriber, key, err))
            })
            .ok()
    }
}

impl Cache for SubscriberCache {
    fn set(&self, key: &str, value: &[u8]) {
        let Some(subscriber) = self.decode(key, value) else {
            return;
        };

        let added = lock::write(&self.topics, CACHE, "set")
            .insert(subscriber.topic_id.clone(), subscriber.function_id.clone());
        trace!(
            key,
            topic_id = %subscriber.topic_id,
            function_id = %subscriber.function_id,
            added,
            "Subscriber indexed"
        );
    }

    fn del(&self, key: &str, value: &[u8]) {
        let Some(subscriber) = self.decode(key, value) else {
            return;
        };

        let removed = lock::write(&self.topics, CACHE, "del")
            .remove(&subscriber.topic_id, &subscriber.function_id);
        trace!(
            key,
            topic_id = %subscriber.topic_id,
            function_id = %subscriber.function_id,
            removed,
            "Subscriber removed"
        );
    }
}
