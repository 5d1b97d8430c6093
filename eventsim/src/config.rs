//! Process configuration sourced from environment variables.

use std::time::Duration;

use crate::errors::{EventError, EventResult};

/// Environment variable controlling the maximum drain wait, in seconds.
pub const MAX_DRAIN_WAIT_ENV: &str = "EVENTSIM_MAX_DRAIN_WAIT_SECS";

const DEFAULT_MAX_DRAIN_WAIT_SECS: u64 = 60;

/// Service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Upper bound on how long shutdown waits for in-flight events.
    pub max_drain_wait_secs: u64,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> EventResult<Self> {
        Self::from_var(std::env::var(MAX_DRAIN_WAIT_ENV).ok().as_deref())
    }

    fn from_var(raw: Option<&str>) -> EventResult<Self> {
        let max_drain_wait_secs = match raw {
            Some(value) => value.parse().map_err(|_| EventError::InvalidConfiguration {
                field: MAX_DRAIN_WAIT_ENV.to_string(),
                reason: format!("expected a number of seconds, got '{value}'"),
            })?,
            None => DEFAULT_MAX_DRAIN_WAIT_SECS,
        };
        Ok(Self { max_drain_wait_secs })
    }

    /// Maximum drain wait as a [`Duration`].
    pub fn max_drain_wait(&self) -> Duration {
        Duration::from_secs(self.max_drain_wait_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_drain_wait_secs: DEFAULT_MAX_DRAIN_WAIT_SECS,
        }
    }
}
