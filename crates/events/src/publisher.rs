//! Best-effort event publication.

use serde::Serialize;
use tracing::warn;

use crate::event::Event;
use crate::sink::EventSink;

/// Publishes lifecycle events to a sink with a single attempt per event.
///
/// A failure - serialization or transport - is logged with the partition
/// key and discarded; it is never surfaced to the caller. There is no
/// internal retry queue: the order store is the source of truth, and
/// downstream delivery is deliberately at-least-once from source with no
/// stronger guarantee.
#[derive(Debug)]
pub struct EventPublisher<K> {
    sink: K,
    topic: String,
}

impl<K: EventSink> EventPublisher<K> {
    pub fn new(sink: K, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Serialize `event` to JSON and hand it to the sink, keyed by `key`.
    ///
    /// Never fails from the caller's perspective.
    pub fn publish_best_effort<E>(&self, key: &str, event: &E)
    where
        E: Event + Serialize,
    {
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    partition_key = key,
                    event_type = event.event_type(),
                    error = %e,
                    "failed to serialize lifecycle event; dropping it"
                );
                return;
            }
        };

        if let Err(e) = self.sink.publish(&self.topic, key, payload) {
            warn!(
                partition_key = key,
                event_type = event.event_type(),
                error = %e,
                "failed to publish lifecycle event; dropping it"
            );
        }
    }
}
