//! Routing facade over the four caches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use eventgate_types::{Endpoint, EndpointId, EntityKind, Function, FunctionId, TopicId};
use serde::Serialize;

use super::entity::{EndpointCache, FunctionCache};
use super::maintainer::{CacheMaintainer, Reactive};
use super::path::{Params, PathMatcher, SegmentMatcher};
use super::publisher::{PublisherCache, PublisherSnapshot};
use super::sink::ErrorSink;
use super::subscriber::SubscriberCache;

/// Questions the router asks for every inbound request or event.
pub trait Targeter: Send + Sync {
    fn function(&self, id: &FunctionId) -> Option<Function>;

    /// The function backing `method` + `path`, with captured path parameters.
    fn http_backing_function(&self, method: &str, path: &str) -> Option<(FunctionId, Params)>;

    fn subscribers_of_topic(&self, topic: &TopicId) -> Vec<FunctionId>;

    fn input_topics(&self, function: &FunctionId) -> Vec<TopicId>;

    fn output_topics(&self, function: &FunctionId) -> Vec<TopicId>;
}

/// Owns the four caches and answers routing queries from them.
///
/// Each cache is created once here and shared, through `Arc`, with the change adapters
/// returned by [`TargetCache::reactors`]. There is no lock spanning caches, so a query that
/// touches two caches may observe them at slightly different points of the change stream.
pub struct TargetCache {
    functions: Arc<FunctionCache>,
    endpoints: Arc<EndpointCache>,
    publishers: Arc<PublisherCache>,
    subscribers: Arc<SubscriberCache>,
    matcher: Arc<dyn PathMatcher>,
}

impl TargetCache {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self::with_matcher(sink, Arc::new(SegmentMatcher))
    }

    pub fn with_matcher(sink: Arc<dyn ErrorSink>, matcher: Arc<dyn PathMatcher>) -> Self {
        Self {
            functions: Arc::new(FunctionCache::new(Arc::clone(&sink))),
            endpoints: Arc::new(EndpointCache::new(Arc::clone(&sink))),
            publishers: Arc::new(PublisherCache::new(Arc::clone(&sink))),
            subscribers: Arc::new(SubscriberCache::new(sink)),
            matcher,
        }
    }

    pub fn functions(&self) -> &Arc<FunctionCache> {
        &self.functions
    }

    pub fn endpoints(&self) -> &Arc<EndpointCache> {
        &self.endpoints
    }

    pub fn publishers(&self) -> &Arc<PublisherCache> {
        &self.publishers
    }

    pub fn subscribers(&self) -> &Arc<SubscriberCache> {
        &self.subscribers
    }

    /// Change adapters writing into this instance's caches.
    pub fn reactors(&self) -> Reactors {
        Reactors {
            functions: CacheMaintainer::new(Arc::clone(&self.functions)),
            endpoints: CacheMaintainer::new(Arc::clone(&self.endpoints)),
            publishers: CacheMaintainer::new(Arc::clone(&self.publishers)),
            subscribers: CacheMaintainer::new(Arc::clone(&self.subscribers)),
        }
    }

    pub fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            functions: self.functions.snapshot(),
            endpoints: self.endpoints.snapshot(),
            publishers: self.publishers.snapshot(),
            subscribers: self.subscribers.snapshot(),
        }
    }
}

impl Targeter for TargetCache {
    fn function(&self, id: &FunctionId) -> Option<Function> {
        self.functions.get(id)
    }

    fn http_backing_function(&self, method: &str, path: &str) -> Option<(FunctionId, Params)> {
        self.endpoints.with_entries(|entries| {
            entries
                .iter()
                .filter(|(_, endpoint)| endpoint.method.eq_ignore_ascii_case(method))
                .filter_map(|(id, endpoint)| {
                    let params = self.matcher.match_path(&endpoint.path, path)?;
                    let specificity = self.matcher.specificity(&endpoint.path);
                    Some((specificity, id, endpoint, params))
                })
                .max_by(|left, right| left.0.cmp(&right.0).then_with(|| right.1.cmp(left.1)))
                .map(|(_, _, endpoint, params)| (endpoint.function_id.clone(), params))
        })
    }

    fn subscribers_of_topic(&self, topic: &TopicId) -> Vec<FunctionId> {
        sorted(self.subscribers.subscribers(topic.as_str()))
    }

    fn input_topics(&self, function: &FunctionId) -> Vec<TopicId> {
        sorted(self.publishers.input_topics(function.as_str()))
    }

    fn output_topics(&self, function: &FunctionId) -> Vec<TopicId> {
        sorted(self.publishers.output_topics(function.as_str()))
    }
}

fn sorted<T: Ord>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut values: Vec<T> = values.into_iter().collect();
    values.sort();
    values
}

/// Adapters that apply configuration-store notifications to a [`TargetCache`].
#[derive(Clone)]
pub struct Reactors {
    pub functions: CacheMaintainer<Arc<FunctionCache>>,
    pub endpoints: CacheMaintainer<Arc<EndpointCache>>,
    pub publishers: CacheMaintainer<Arc<PublisherCache>>,
    pub subscribers: CacheMaintainer<Arc<SubscriberCache>>,
}

impl Reactors {
    pub fn for_kind(&self, kind: EntityKind) -> &dyn Reactive {
        match kind {
            EntityKind::Function => &self.functions,
            EntityKind::Endpoint => &self.endpoints,
            EntityKind::Publisher => &self.publishers,
            EntityKind::Subscriber => &self.subscribers,
        }
    }
}

/// Point-in-time copy of every cache, ordered for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSnapshot {
    pub functions: BTreeMap<FunctionId, Function>,
    pub endpoints: BTreeMap<EndpointId, Endpoint>,
    pub publishers: PublisherSnapshot,
    pub subscribers: BTreeMap<TopicId, BTreeSet<FunctionId>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::targetcache::sink::RecordingSink;

    fn bytes(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn target_cache() -> TargetCache {
        TargetCache::new(Arc::new(RecordingSink::new()))
    }

    fn endpoint(function: &str, method: &str, path: &str) -> Vec<u8> {
        bytes(json!({"functionId": function, "method": method, "path": path}))
    }

    #[test]
    fn reactors_write_into_shared_caches() {
        let cache = target_cache();
        let reactors = cache.reactors();

        reactors.for_kind(EntityKind::Function).created(
            "fn1",
            &bytes(json!({"functionId": "fn1", "provider": {"type": "http", "url": "http://a"}})),
        );

        assert!(cache.function(&FunctionId::from("fn1")).is_some());

        reactors.for_kind(EntityKind::Function).deleted("fn1", &[]);
        assert!(cache.function(&FunctionId::from("fn1")).is_none());
    }

    #[test]
    fn http_lookup_prefers_most_specific_endpoint() {
        let cache = target_cache();
        let reactors = cache.reactors();
        reactors
            .endpoints
            .created("ep-param", &endpoint("by-id", "GET", "/users/:id"));
        reactors
            .endpoints
            .created("ep-static", &endpoint("me", "GET", "/users/me"));
        reactors
            .endpoints
            .created("ep-wild", &endpoint("any", "GET", "/users/*rest"));

        let (function, params) = cache.http_backing_function("get", "/users/me").unwrap();
        assert_eq!(function.as_str(), "me");
        assert!(params.is_empty());

        let (function, params) = cache.http_backing_function("GET", "/users/42").unwrap();
        assert_eq!(function.as_str(), "by-id");
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let (function, _) = cache.http_backing_function("GET", "/users/42/posts").unwrap();
        assert_eq!(function.as_str(), "any");

        assert!(cache.http_backing_function("POST", "/users/42").is_none());
    }

    #[test]
    fn topic_queries_are_sorted() {
        let cache = target_cache();
        let reactors = cache.reactors();
        for (key, function) in [("s1", "f2"), ("s2", "f1"), ("s3", "f3")] {
            reactors.subscribers.created(
                key,
                &bytes(json!({"topicId": "orders", "functionId": function})),
            );
        }
        reactors.publishers.created(
            "p1",
            &bytes(json!({"functionId": "f1", "topicId": "zeta", "functionEnd": "output"})),
        );
        reactors.publishers.created(
            "p2",
            &bytes(json!({"functionId": "f1", "topicId": "alpha", "functionEnd": "output"})),
        );

        let subscribers: Vec<_> = cache
            .subscribers_of_topic(&TopicId::from("orders"))
            .into_iter()
            .map(FunctionId::into_inner)
            .collect();
        assert_eq!(subscribers, vec!["f1", "f2", "f3"]);

        let outputs: Vec<_> = cache
            .output_topics(&FunctionId::from("f1"))
            .into_iter()
            .map(TopicId::into_inner)
            .collect();
        assert_eq!(outputs, vec!["alpha", "zeta"]);
        assert!(cache.input_topics(&FunctionId::from("f1")).is_empty());
    }

    #[test]
    fn custom_matcher_is_consulted() {
        struct PrefixMatcher;

        impl PathMatcher for PrefixMatcher {
            fn match_path(&self, pattern: &str, path: &str) -> Option<Params> {
                path.starts_with(pattern).then(Params::new)
            }
        }

        let cache =
            TargetCache::with_matcher(Arc::new(RecordingSink::new()), Arc::new(PrefixMatcher));
        cache
            .reactors()
            .endpoints
            .created("ep1", &endpoint("fn1", "GET", "/api"));

        let (function, _) = cache.http_backing_function("GET", "/api/anything").unwrap();
        assert_eq!(function.as_str(), "fn1");
    }
}
