//! # HTTP Server
//!
//! HTTP server for event ingestion, metrics, and Kubernetes probes.
//!
//! Provides endpoints:
//! - `POST /` - Accepts a JSON event and posts it as a commit status
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - Liveness probe (always returns 200)
//! - `/readyz` - Readiness probe (returns 200 when the notifier is ready)
//!
//! Every error that leaves this module, in logs or in response bodies, has
//! been passed through the token redactor first.

use crate::error::NotifierError;
use crate::event::Event;
use crate::notifier::Notifier;
use crate::observability::metrics;
use crate::redact::{redact_secrets_in_text, redacted_secrets_message};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

/// Shared state of the HTTP server
pub struct ServerState {
    pub is_ready: Arc<AtomicBool>,
    notifier: Arc<dyn Notifier>,
    secrets: Vec<Zeroizing<Vec<u8>>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("is_ready", &self.is_ready.load(Ordering::Relaxed))
            .field("provider", &self.notifier.provider())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Create server state for `notifier`; every one of `secrets` is redacted
    /// from errors and log fields
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, secrets: &[&[u8]]) -> Self {
        Self {
            is_ready: Arc::new(AtomicBool::new(false)),
            notifier,
            secrets: secrets
                .iter()
                .map(|secret| Zeroizing::new(secret.to_vec()))
                .collect(),
        }
    }

    fn redact(&self, err: &anyhow::Error) -> String {
        redacted_secrets_message(err, &self.secret_slices())
    }

    fn redact_text(&self, text: &str) -> String {
        redact_secrets_in_text(text, &self.secret_slices())
    }

    fn secret_slices(&self) -> Vec<&[u8]> {
        self.secrets.iter().map(|secret| secret.as_slice()).collect()
    }
}

/// Build the router (without binding a listener)
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", post(event_handler))
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `0.0.0.0:port` until the process exits
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails.
pub async fn start_server(port: u16, state: Arc<ServerState>) -> Result<(), anyhow::Error> {
    let app = router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);
    state.is_ready.store(true, Ordering::Relaxed);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn event_handler(State(state): State<Arc<ServerState>>, body: Bytes) -> impl IntoResponse {
    let event: Event = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            let message = state.redact(&anyhow::Error::new(e));
            warn!("Rejected malformed event: {}", message);
            return (StatusCode::BAD_REQUEST, message);
        }
    };

    let provider = state.notifier.provider();
    match state.notifier.post(&event).await {
        Ok(()) => (StatusCode::ACCEPTED, String::new()),
        Err(e) => {
            let status = status_for(&e);
            let message = state.redact(&anyhow::Error::new(e));
            let object = state.redact_text(&format!(
                "{}/{}",
                event.involved_object.kind, event.involved_object.name
            ));
            error!(
                provider = provider,
                object = %object,
                "Failed to post commit status: {}",
                message
            );
            (status, message)
        }
    }
}

fn status_for(e: &NotifierError) -> StatusCode {
    match e {
        NotifierError::Transport { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = metrics::gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        buffer,
    )
}

async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn readyz_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    if state.is_ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
