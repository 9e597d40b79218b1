//! Concurrent writers on disjoint keys interleaved with readers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use eventgate::targetcache::{Reactive, RecordingSink, TargetCache, Targeter};
use eventgate_types::{FunctionId, Provider, TopicId};
use serde_json::json;

const WRITERS: usize = 8;
const READERS: usize = 4;
const ROUNDS: usize = 200;

fn function(id: &str, round: usize) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "functionId": id,
        "provider": {"type": "http", "url": format!("http://{id}/{round}")},
    }))
    .expect("encode function")
}

fn binding(function: &str, topic: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "functionId": function,
        "topicId": topic,
        "functionEnd": "output",
    }))
    .expect("encode publisher")
}

fn subscription(topic: &str, function: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({"topicId": topic, "functionId": function}))
        .expect("encode subscriber")
}

#[test]
fn readers_never_observe_torn_entries() {
    let sink = Arc::new(RecordingSink::new());
    let targets = TargetCache::new(sink.clone());
    let reactors = targets.reactors();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let writers: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let reactors = reactors.clone();
                scope.spawn(move || {
                    let id = format!("fn-{writer}");
                    let topic = format!("topic-{writer}");
                    for round in 0..ROUNDS {
                        reactors.functions.modified(&id, &function(&id, round));
                        reactors
                            .publishers
                            .modified(&format!("pub-{writer}"), &binding(&id, &topic));
                        reactors
                            .subscribers
                            .created(&format!("sub-{writer}"), &subscription(&topic, &id));
                        if round % 3 == 0 {
                            reactors.functions.deleted(&id, &[]);
                            reactors.subscribers.deleted(
                                &format!("sub-{writer}"),
                                &subscription(&topic, &id),
                            );
                        }
                    }
                    // Leave every writer with a known final state.
                    reactors.functions.modified(&id, &function(&id, ROUNDS));
                    reactors
                        .subscribers
                        .created(&format!("sub-{writer}"), &subscription(&topic, &id));
                })
            })
            .collect();

        for _ in 0..READERS {
            scope.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    for writer in 0..WRITERS {
                        let id = FunctionId::new(format!("fn-{writer}"));
                        if let Some(stored) = targets.function(&id) {
                            assert_eq!(stored.id, id);
                            let Provider::Http { url } = stored.provider else {
                                panic!("unexpected provider for {id}");
                            };
                            assert!(url.starts_with(&format!("http://{id}/")));
                        }

                        let topic = TopicId::new(format!("topic-{writer}"));
                        for subscriber in targets.subscribers_of_topic(&topic) {
                            assert_eq!(subscriber, id);
                        }
                        for output in targets.output_topics(&id) {
                            assert_eq!(output, topic);
                        }
                    }
                }
            });
        }

        for writer in writers {
            writer.join().expect("writer thread");
        }
        done.store(true, Ordering::Release);
    });

    for writer in 0..WRITERS {
        let id = FunctionId::new(format!("fn-{writer}"));
        let topic = TopicId::new(format!("topic-{writer}"));

        let stored = targets.function(&id).expect("final function present");
        assert_eq!(
            stored.provider,
            Provider::Http {
                url: format!("http://{id}/{ROUNDS}")
            }
        );
        assert_eq!(targets.subscribers_of_topic(&topic), vec![id.clone()]);
        assert_eq!(targets.output_topics(&id), vec![topic]);
    }
    assert_eq!(targets.functions().len(), WRITERS);
    assert_eq!(targets.publishers().len(), WRITERS);
    assert!(sink.is_empty());
}
