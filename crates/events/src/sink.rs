//! Outbound event transport abstraction (mechanics only).
//!
//! The sink is the **fire-and-forget channel** out of the core - lifecycle
//! events are handed to it after the order has been persisted, and the
//! order store remains the source of truth regardless of what happens on
//! the other side.
//!
//! ## Design Philosophy
//!
//! The sink is intentionally **lightweight** and makes minimal assumptions:
//!
//! - **Transport-agnostic**: works with an in-memory recorder, a message
//!   broker client, etc.
//! - **At-least-once from source**: a successful publish means one attempt
//!   reached the transport; consumers must be idempotent
//! - **Per-key ordering only**: the partition key (the order id) keeps all
//!   events for one order observably ordered by a single consumer group;
//!   nothing is guaranteed across keys
//! - **No persistence**: the sink is for distribution, not storage

use std::sync::Arc;

/// Domain-agnostic outbound event transport.
///
/// `publish` hands one serialized payload to the transport, routed by
/// `topic` and partitioned by `key`. Failures are surfaced to the caller
/// (typically [`crate::EventPublisher`], which logs and discards them);
/// implementations must not retry internally.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`; multiple request threads publish
/// concurrently.
pub trait EventSink: Send + Sync {
    fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> anyhow::Result<()>;
}

impl<S> EventSink for Arc<S>
where
    S: EventSink + ?Sized,
{
    fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> anyhow::Result<()> {
        (**self).publish(topic, key, payload)
    }
}
