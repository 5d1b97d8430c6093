use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use eventsim::{
    DrainController, EventError, EventProcessor, EventRegistry, EventResult, Settings,
};

use crate::routes::{create_routes, ServerState};

/// HTTP server for the event service.
///
/// Couples the axum transport to the shutdown drain: once the listener has
/// stopped accepting requests, in-flight events are drained (bounded by the
/// configured maximum wait) before [`EventServer::serve`] returns.
pub struct EventServer {
    state: ServerState,
    settings: Settings,
    shutdown: CancellationToken,
}

impl EventServer {
    /// Create a new event server builder
    pub fn builder() -> EventServerBuilder {
        EventServerBuilder::new()
    }

    /// Token that triggers graceful shutdown when cancelled.
    ///
    /// A SIGINT cancels it too; tests can cancel it directly instead of
    /// delivering a process signal.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Convert the server into an axum router
    pub fn into_router(self) -> Router {
        create_routes(self.state).layer(TraceLayer::new_for_http())
    }

    /// Run the server on the specified address until shutdown, then drain
    /// in-flight events before returning.
    pub async fn serve(self, addr: impl tokio::net::ToSocketAddrs) -> EventResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| EventError::ServerStartFailed(e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| EventError::ServerStartFailed(e.to_string()))?;

        tracing::info!(
            address = %local_addr,
            max_drain_wait_secs = self.settings.max_drain_wait_secs,
            "event server listening"
        );

        let drain = DrainController::new(
            Arc::clone(&self.state.registry),
            self.settings.max_drain_wait(),
        );
        let shutdown = self.shutdown.clone();
        let app = self.into_router();

        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.cancel();
                }
            }
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| EventError::ServerStartFailed(e.to_string()))?;

        // The listener is closed, so no new submissions can arrive. Wait
        // for in-flight events before allowing process exit.
        let waited = drain.drain().await;
        tracing::info!(waited_secs = waited.as_secs(), "shutdown drain complete");
        Ok(())
    }
}

/// Builder for configuring an event server
pub struct EventServerBuilder {
    registry: Option<Arc<EventRegistry>>,
    settings: Option<Settings>,
}

impl EventServerBuilder {
    fn new() -> Self {
        Self {
            registry: None,
            settings: None,
        }
    }

    /// Use an existing registry instead of a fresh one.
    pub fn with_registry(mut self, registry: Arc<EventRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override settings (defaults to [`Settings::default`]).
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the event server
    pub fn build(self) -> EventServer {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(EventRegistry::new()));
        let processor = Arc::new(EventProcessor::new(Arc::clone(&registry)));

        EventServer {
            state: ServerState {
                processor,
                registry,
            },
            settings: self.settings.unwrap_or_default(),
            shutdown: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn server_shuts_down_on_cancel() {
        let server = EventServer::builder().build();
        let token = server.shutdown_token();

        let server_handle = tokio::spawn(async move { server.serve("127.0.0.1:0").await });

        // Give the listener a moment to bind, then trigger shutdown.
        sleep(Duration::from_millis(100)).await;
        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), server_handle).await;
        let serve_result = result.expect("server should shut down when the token is cancelled");
        assert!(serve_result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn builder_shares_the_given_registry() {
        let registry = Arc::new(EventRegistry::new());
        let server = EventServer::builder()
            .with_registry(Arc::clone(&registry))
            .with_settings(Settings {
                max_drain_wait_secs: 5,
            })
            .build();

        assert!(Arc::ptr_eq(&registry, &server.state.registry));
        assert_eq!(server.settings.max_drain_wait_secs, 5);
    }
}
