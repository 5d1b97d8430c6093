use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use eventsim::{Event, EventProcessor, EventRegistry, EventRequest};

use crate::error::Result;

/// State shared across all routes
#[derive(Clone)]
pub struct ServerState {
    pub processor: Arc<EventProcessor>,
    pub registry: Arc<EventRegistry>,
}

/// Create the event service routes
pub fn create_routes(state: ServerState) -> Router {
    Router::new()
        .route("/events/submit", post(submit_event))
        .route("/events", get(list_events))
        .route("/heartbeat", get(heartbeat))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SubmitParams {
    #[serde(default)]
    wait: bool,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    ongoing_only: bool,
}

/// Handler for POST /events/submit
///
/// A body with an unknown event type never reaches the processor: the
/// `Json` extractor rejects it with 422 before this handler runs.
async fn submit_event(
    State(state): State<ServerState>,
    Query(params): Query<SubmitParams>,
    Json(request): Json<EventRequest>,
) -> Result<Json<Event>> {
    let event = state.processor.submit(request, params.wait).await?;
    Ok(Json(event))
}

/// Handler for GET /events
async fn list_events(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Event>> {
    Json(state.registry.list(params.ongoing_only).await)
}

/// Handler for GET /heartbeat
async fn heartbeat() -> impl IntoResponse {
    Json(json!({"message": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn create_test_router() -> (Router, Arc<EventRegistry>) {
        let registry = Arc::new(EventRegistry::new());
        let state = ServerState {
            processor: Arc::new(EventProcessor::new(Arc::clone(&registry))),
            registry: Arc::clone(&registry),
        };
        (create_routes(state), registry)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn submit_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn submit_returns_pending_event() {
        let (app, _registry) = create_test_router();

        let response = app
            .oneshot(submit_request("/events/submit", r#"{"type": "SHORT"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["type"], "SHORT");
        assert!(!body["key"].as_str().unwrap().is_empty());
        assert!(body["submitted_at"].is_string());
        assert!(body["processed_at"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_with_wait_returns_processed_event() {
        let (app, _registry) = create_test_router();

        let response = app
            .oneshot(submit_request(
                "/events/submit?wait=true",
                r#"{"type": "SHORT"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["processed_at"].is_string());
    }

    #[tokio::test]
    async fn unknown_event_type_is_unprocessable() {
        let (app, registry) = create_test_router();

        let response = app
            .oneshot(submit_request("/events/submit", r#"{"type": "HUGE"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(registry.list(false).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn list_filters_ongoing_events() {
        let (app, registry) = create_test_router();

        let response = app
            .clone()
            .oneshot(submit_request("/events/submit", r#"{"type": "SHORT"}"#))
            .await
            .unwrap();
        let submitted = body_json(response).await;
        let key = submitted["key"].as_str().unwrap().to_string();

        // Within the delay window the event shows up in the ongoing view.
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/events?ongoing_only=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let ongoing = body_json(response).await;
        assert_eq!(ongoing[0]["key"], key.as_str());

        // Past the longest SHORT delay it only shows in the full list.
        tokio::time::sleep(tokio::time::Duration::from_secs(6)).await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/events?ongoing_only=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let ongoing = body_json(response).await;
        assert_eq!(ongoing.as_array().unwrap().len(), 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let total = body_json(response).await;
        assert_eq!(total[0]["key"], key.as_str());
        assert!(total[0]["processed_at"].is_string());
    }

    #[tokio::test]
    async fn heartbeat_returns_static_payload() {
        let (app, _registry) = create_test_router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/heartbeat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, json!({"message": "ok"}));
    }
}
