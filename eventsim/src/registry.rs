//! In-memory event registry.
//!
//! The registry is the single place the rest of the service looks to for
//! event state. It is an explicit object constructed at process start and
//! passed by handle to the processor and the drain controller, so tests can
//! run independent instances side by side.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::event::{Event, SharedEvent};

/// In-memory store of every event the process has accepted.
///
/// Two keyed collections over shared records: `total` holds every event ever
/// submitted and never evicts, so memory grows with submissions for the
/// lifetime of the process. That is acceptable for a demonstration service
/// but not for production use. `ongoing` holds the subset whose background
/// run has started and not yet finished, and is always a subset of `total`.
///
/// Both collections store the same [`SharedEvent`] instance per key, so the
/// completion timestamp written by the background run is observed through
/// `total` lookups as well.
#[derive(Debug, Default)]
pub struct EventRegistry {
    total: RwLock<HashMap<String, SharedEvent>>,
    ongoing: RwLock<HashMap<String, SharedEvent>>,
}

impl EventRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites an event in Total under its key.
    ///
    /// Keys carry enough entropy that collisions are treated as impossible;
    /// there is no uniqueness check beyond the map insert itself.
    pub async fn put_total(&self, event: &SharedEvent) {
        let key = event.read().await.key.clone();
        self.total.write().await.insert(key, Arc::clone(event));
    }

    /// Inserts an event into Ongoing under its key.
    pub async fn mark_ongoing(&self, event: &SharedEvent) {
        let key = event.read().await.key.clone();
        self.ongoing.write().await.insert(key, Arc::clone(event));
    }

    /// Removes an event from Ongoing. A missing key is a no-op: shutdown
    /// races may already have observed completion.
    pub async fn mark_done(&self, key: &str) {
        self.ongoing.write().await.remove(key);
    }

    /// Snapshot of a single event from Total.
    pub async fn get(&self, key: &str) -> Option<Event> {
        let record = self.total.read().await.get(key).cloned();
        match record {
            Some(record) => Some(record.read().await.clone()),
            None => None,
        }
    }

    /// Snapshot of either collection.
    ///
    /// Ordered by submission time with the key as a tie-break, so the order
    /// is deterministic for a given state.
    pub async fn list(&self, ongoing_only: bool) -> Vec<Event> {
        let records: Vec<SharedEvent> = if ongoing_only {
            self.ongoing.read().await.values().cloned().collect()
        } else {
            self.total.read().await.values().cloned().collect()
        };

        let mut events = Vec::with_capacity(records.len());
        for record in records {
            events.push(record.read().await.clone());
        }
        events.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        events
    }

    /// Current number of ongoing events.
    pub async fn ongoing_count(&self) -> usize {
        self.ongoing.read().await.len()
    }
}
