//! In-memory event sink for tests/dev.

use std::sync::{Mutex, PoisonError};

use crate::sink::EventSink;

/// Record of one published message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

/// In-memory sink.
///
/// - No IO / no async
/// - Records every publish in arrival order
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    records: Mutex<Vec<PublishedRecord>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in publish order.
    pub fn published(&self) -> Vec<PublishedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything published under one partition key, in publish order.
    pub fn published_for_key(&self, key: &str) -> Vec<PublishedRecord> {
        self.published()
            .into_iter()
            .filter(|r| r.key == key)
            .collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PublishedRecord {
                topic: topic.to_string(),
                key: key.to_string(),
                payload,
            });
        Ok(())
    }
}
