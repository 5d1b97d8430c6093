//! Bounded drain of in-flight events at shutdown.

use std::sync::Arc;

use tokio::time::Duration;

use crate::registry::EventRegistry;

/// How often the controller re-checks the ongoing count.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Phases of the shutdown drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Draining,
    Done,
}

/// Waits at shutdown for ongoing events to finish, bounded by a configured
/// maximum.
///
/// The controller never cancels in-flight work. Past the maximum wait it
/// transitions to [`DrainState::Done`] regardless, and whatever is still
/// running is abandoned when the process exits. The drain is best-effort,
/// not a hard guarantee.
pub struct DrainController {
    registry: Arc<EventRegistry>,
    max_wait: Duration,
}

impl DrainController {
    /// Creates a controller that reads the given registry and gives up
    /// after `max_wait`.
    pub fn new(registry: Arc<EventRegistry>, max_wait: Duration) -> Self {
        Self { registry, max_wait }
    }

    /// Polls the registry once per second until Ongoing is empty or the
    /// maximum wait has accumulated, then returns the total time waited.
    pub async fn drain(&self) -> Duration {
        let mut state = DrainState::Draining;
        let mut waited = Duration::ZERO;

        while state == DrainState::Draining {
            if self.registry.ongoing_count().await == 0 {
                state = DrainState::Done;
            } else if waited >= self.max_wait {
                tracing::warn!(
                    waited_secs = waited.as_secs(),
                    "maximum drain wait reached, giving up on in-flight events"
                );
                state = DrainState::Done;
            } else {
                tokio::time::sleep(POLL_INTERVAL).await;
                waited += POLL_INTERVAL;
                tracing::info!(
                    waited_secs = waited.as_secs(),
                    "waiting for ongoing events to finish"
                );
            }
        }
        waited
    }
}
