//! Lifecycle event emission: the `Event` trait, the transport-agnostic
//! `EventSink` port, and the best-effort `EventPublisher`.

pub mod event;
pub mod in_memory;
pub mod publisher;
pub mod sink;

pub use event::Event;
pub use in_memory::{InMemoryEventSink, PublishedRecord};
pub use publisher::EventPublisher;
pub use sink::EventSink;
