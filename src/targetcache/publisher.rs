//! Publisher bindings and the per-function topic indices derived from them.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use eventgate_types::{EntityKind, FunctionEnd, FunctionId, Publisher, PublisherId, TopicId};
use serde::Serialize;
use tracing::trace;

use super::error::CacheError;
use super::lock;
use super::maintainer::Cache;
use super::multimap::SetMultiMap;
use super::sink::ErrorSink;

const CACHE: &str = "publisher";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    Input,
    Output,
}

impl Direction {
    fn of(end: &FunctionEnd) -> Option<Self> {
        match end {
            FunctionEnd::Input => Some(Direction::Input),
            FunctionEnd::Output => Some(Direction::Output),
            FunctionEnd::Unrecognized(_) => None,
        }
    }
}

type PairKey = (Direction, FunctionId, TopicId);

#[derive(Debug, Default, Clone, PartialEq)]
struct PublisherIndex {
    publishers: HashMap<PublisherId, Publisher>,
    input_topics: SetMultiMap<FunctionId, TopicId>,
    output_topics: SetMultiMap<FunctionId, TopicId>,
    /// Stored bindings backing each indexed pair. A pair is indexed while its count is nonzero.
    refs: HashMap<PairKey, usize>,
}

impl PublisherIndex {
    fn topics_for_mut(&mut self, direction: Direction) -> &mut SetMultiMap<FunctionId, TopicId> {
        match direction {
            Direction::Input => &mut self.input_topics,
            Direction::Output => &mut self.output_topics,
        }
    }

    /// Index `publisher`. Returns `false` when its function end is unusable.
    fn link(&mut self, publisher: &Publisher) -> bool {
        let Some(direction) = Direction::of(&publisher.function_end) else {
            return false;
        };

        let key = (
            direction,
            publisher.function_id.clone(),
            publisher.topic_id.clone(),
        );
        let count = self.refs.entry(key).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.topics_for_mut(direction)
                .insert(publisher.function_id.clone(), publisher.topic_id.clone());
        }
        true
    }

    /// Drop one reference to the pair of `publisher`, retracting it with the last one.
    fn unlink(&mut self, publisher: &Publisher) -> bool {
        let Some(direction) = Direction::of(&publisher.function_end) else {
            return false;
        };

        let key = (
            direction,
            publisher.function_id.clone(),
            publisher.topic_id.clone(),
        );
        let remaining = match self.refs.get_mut(&key) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => return true,
        };
        if remaining == 0 {
            self.refs.remove(&key);
            self.topics_for_mut(direction)
                .remove(&publisher.function_id, &publisher.topic_id);
        }
        true
    }
}

/// Caches publisher bindings and indexes them by function and direction.
///
/// Deletions trust the binding retained here, not the payload that comes with the
/// deletion notification.
pub struct PublisherCache {
    index: RwLock<PublisherIndex>,
    sink: Arc<dyn ErrorSink>,
}

impl PublisherCache {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            index: RwLock::new(PublisherIndex::default()),
            sink,
        }
    }

    pub fn publisher(&self, id: &str) -> Option<Publisher> {
        lock::read(&self.index, CACHE, "publisher")
            .publishers
            .get(id)
            .cloned()
    }

    /// Topics whose events `function` consumes. Empty when there are none.
    pub fn input_topics(&self, function: &str) -> HashSet<TopicId> {
        lock::read(&self.index, CACHE, "input_topics")
            .input_topics
            .get(function)
            .cloned()
            .unwrap_or_default()
    }

    /// Topics `function` produces to. Empty when there are none.
    pub fn output_topics(&self, function: &str) -> HashSet<TopicId> {
        lock::read(&self.index, CACHE, "output_topics")
            .output_topics
            .get(function)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        lock::read(&self.index, CACHE, "len").publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> PublisherSnapshot {
        let index = lock::read(&self.index, CACHE, "snapshot");
        PublisherSnapshot {
            publishers: index
                .publishers
                .iter()
                .map(|(id, publisher)| (id.clone(), publisher.clone()))
                .collect(),
            input_topics: index.input_topics.to_ordered(),
            output_topics: index.output_topics.to_ordered(),
        }
    }
}

impl Cache for PublisherCache {
    fn set(&self, key: &str, value: &[u8]) {
        let publisher = match serde_json::from_slice::<Publisher>(value) {
            Ok(publisher) => publisher,
            Err(err) => {
                self.sink
                    .report(CacheError::decode(EntityKind::Publisher, key, err));
                return;
            }
        };

        let linked = {
            let mut index = lock::write(&self.index, CACHE, "set");
            let previous = index
                .publishers
                .insert(PublisherId::from(key), publisher.clone());
            if let Some(previous) = previous {
                index.unlink(&previous);
            }
            index.link(&publisher)
        };

        if linked {
            trace!(
                key,
                function_id = %publisher.function_id,
                topic_id = %publisher.topic_id,
                function_end = %publisher.function_end,
                "Publisher indexed"
            );
        } else {
            self.sink.report(CacheError::invalid_function_end(
                key,
                publisher.function_end.as_str(),
            ));
        }
    }

    fn del(&self, key: &str, _value: &[u8]) {
        let removed = {
            let mut index = lock::write(&self.index, CACHE, "del");
            match index.publishers.remove(key) {
                Some(previous) => {
                    let unlinked = index.unlink(&previous);
                    Some((previous, unlinked))
                }
                None => None,
            }
        };

        match removed {
            Some((previous, false)) => self.sink.report(CacheError::invalid_function_end(
                key,
                previous.function_end.as_str(),
            )),
            Some((_, true)) => trace!(key, "Publisher removed"),
            None => {}
        }
    }
}

/// Ordered copy of a publisher cache, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublisherSnapshot {
    pub publishers: BTreeMap<PublisherId, Publisher>,
    pub input_topics: BTreeMap<FunctionId, BTreeSet<TopicId>>,
    pub output_topics: BTreeMap<FunctionId, BTreeSet<TopicId>>,
}
