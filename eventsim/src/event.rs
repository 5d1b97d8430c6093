//! Event data model.
//!
//! An event is a unit of simulated work. Its class ([`EventType`]) decides
//! how long the processing delay runs; the record itself carries the
//! submission and completion timestamps the registry tracks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Classes of simulated work, ordered by how long processing takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Long,
    Mid,
    Short,
}

impl EventType {
    /// Inclusive range of processing delays for this class, in seconds.
    pub fn delay_range_secs(self) -> RangeInclusive<u64> {
        match self {
            Self::Long => 10..=30,
            Self::Mid => 5..=10,
            Self::Short => 1..=5,
        }
    }
}

/// Submission payload: the class of event to simulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(rename = "type")]
    pub event_type: EventType,
}

/// A unit of simulated work tracked by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub key: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub submitted_at: DateTime<Utc>,
    /// `None` while processing is in flight; set exactly once on completion.
    pub processed_at: Option<DateTime<Utc>>,
}

/// Handle to an event record shared between the Total and Ongoing
/// collections. Both hold the same instance, so a completion timestamp
/// written by the background run is visible through Total lookups.
pub type SharedEvent = Arc<RwLock<Event>>;
