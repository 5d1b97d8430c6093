//! Event submission and simulated background processing.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::RwLock;
use tokio::time::Duration;
use uuid::Uuid;

use crate::errors::EventResult;
use crate::event::{Event, EventRequest, SharedEvent};
use crate::registry::EventRegistry;

/// Accepts event submissions and launches their simulated processing as
/// background tasks against a shared [`EventRegistry`].
#[derive(Clone)]
pub struct EventProcessor {
    registry: Arc<EventRegistry>,
}

impl EventProcessor {
    /// Creates a processor backed by the given registry.
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    /// Accepts a new event and launches its background run.
    ///
    /// The returned record reflects the state at the moment of response:
    /// with `wait` the call suspends until processing completes, so
    /// `processed_at` is always set; without it the snapshot is taken
    /// before the background task starts, so `processed_at` is always
    /// absent even if the task races ahead.
    pub async fn submit(&self, request: EventRequest, wait: bool) -> EventResult<Event> {
        let key = Uuid::new_v4().to_string();
        let record: SharedEvent = Arc::new(RwLock::new(Event {
            key: key.clone(),
            event_type: request.event_type,
            submitted_at: Utc::now(),
            processed_at: None,
        }));
        self.registry.put_total(&record).await;
        tracing::info!(key = %key, event_type = ?request.event_type, "received event");

        let delay_secs = rand::rng().random_range(request.event_type.delay_range_secs());
        let snapshot = record.read().await.clone();
        let handle = tokio::spawn(run(
            Arc::clone(&self.registry),
            Arc::clone(&record),
            Duration::from_secs(delay_secs),
        ));

        if wait {
            handle.await?;
            return Ok(record.read().await.clone());
        }
        Ok(snapshot)
    }
}

/// Background unit of work for one event: marks it ongoing, sleeps for the
/// drawn delay, stamps `processed_at`, and removes it from Ongoing. Always
/// completes; there is no failure or cancellation path.
async fn run(registry: Arc<EventRegistry>, record: SharedEvent, delay: Duration) {
    registry.mark_ongoing(&record).await;
    let key = record.read().await.key.clone();
    tracing::info!(key = %key, "processing event");

    tokio::time::sleep(delay).await;

    record.write().await.processed_at = Some(Utc::now());
    registry.mark_done(&key).await;
    tracing::info!(key = %key, "finished processing event");
}
