//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Relay POSTed events to the aggregator
//! - Report liveness on `/health`

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::config::{RelayConfig, RelayMode};
use crate::error::RelayError;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::relay::Relay;
use crate::upstream::{UpstreamResponse, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub config: Arc<RelayConfig>,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl RelayServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> UpstreamResult<Self> {
        let relay = Arc::new(Relay::from_config(&config)?);
        let config = Arc::new(config);

        let state = AppState {
            relay,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(map_response(render_timeout))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )));

        // POSTs to `/health` are relayed like any other path.
        Router::new()
            .route("/health", get(health_handler).post(relay_handler))
            .route("/", post(relay_handler))
            .route("/{*path}", post(relay_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_size))
            .layer(middleware)
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.config.mode,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Relay one inbound event to the aggregator.
async fn relay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let span = tracing::info_span!("relay", request_id = %request_id, mode = %state.relay.mode());

    let outcome = async {
        tracing::debug!("Received request");
        let body = body.map_err(RelayError::Body)?;
        state.relay.forward(&body).await
    }
    .instrument(span.clone())
    .await;

    span.in_scope(|| finish(outcome, start_time))
}

fn finish(outcome: Result<UpstreamResponse, RelayError>, start_time: Instant) -> Response {
    match outcome {
        Ok(_) => {
            tracing::info!("Successfully delivered data to GoRadar");
            metrics::record_request("delivered", start_time);
            response::success()
        }
        Err(e) => {
            match &e {
                RelayError::Rejected { status, body } => tracing::error!(
                    upstream_status = %status,
                    upstream_body = %body,
                    "Send to GoRadar failed"
                ),
                e if e.is_client_error() => tracing::warn!(error = %e, "Rejected inbound request"),
                e => tracing::error!(error = %e, "Failed to send data to GoRadar"),
            }
            metrics::record_request(e.outcome(), start_time);
            e.into_response()
        }
    }
}

/// Give the empty 408 from the timeout layer the usual JSON body.
async fn render_timeout(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("Inbound request timed out");
    metrics::record_request_timeout();
    response::message(StatusCode::REQUEST_TIMEOUT, response::FAILED)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
    mode: RelayMode,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.relay.mode(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let mut config = RelayConfig::default();
        // Never contacted by these tests.
        config.upstream.url = "http://127.0.0.1:9/submit".into();
        config.upstream.use_system_proxy = false;
        RelayServer::new(config).unwrap().into_router()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from("this is not json"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "invalid json" })
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = RelayConfig::default();
        config.upstream.url = "http://127.0.0.1:9/submit".into();
        config.listener.max_body_size = 16;
        let router = RelayServer::new(config).unwrap().into_router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from(vec![b' '; 64]))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "invalid body" })
        );
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "transform");
    }

    #[tokio::test]
    async fn test_post_to_health_is_relayed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/health")
            .body(Body::from("this is not json"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "invalid json" })
        );
    }

    #[tokio::test]
    async fn test_timeout_renders_json() {
        let response = render_timeout(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "failed" })
        );
    }

    #[tokio::test]
    async fn test_get_on_relay_path_not_allowed() {
        let request = Request::builder()
            .uri("/submit")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/any/path")
            .header("x-request-id", "req-42")
            .body(Body::from("{"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
    }
}
