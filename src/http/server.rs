//! HTTP probe server.
//!
//! # Responsibilities
//! - Create Axum Router answering every method and path with a probe
//! - Bound each probe by the configured request deadline
//! - Map verdicts to status codes (200 healthy, 503 otherwise)
//! - Serve until the shutdown signal, then drain in-flight probes

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::HealthConfig;
use crate::health::{ProbeHandler, ProbeOutcome, ProbeStage, StatusSource, Verdict};
use crate::lifecycle::recv_shutdown;
use crate::observability::metrics;

/// Reason reported when a probe overruns the request deadline.
pub const PROBE_TIMED_OUT: &str = "probe timed out";

/// Application state injected into handlers.
pub struct AppState<S> {
    pub handler: Arc<ProbeHandler<S>>,
    pub request_timeout: Duration,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            request_timeout: self.request_timeout,
        }
    }
}

/// HTTP server exposing the health probe.
pub struct ProbeServer {
    router: Router,
}

impl ProbeServer {
    pub fn new<S: StatusSource>(config: &HealthConfig, source: S) -> Self {
        let state = AppState {
            handler: Arc::new(ProbeHandler::new(source, config.policy())),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        Self {
            router: build_router(state),
        }
    }

    /// Serve probes until `shutdown` fires, then wait for in-flight probes.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Probe server started");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                recv_shutdown(shutdown).await;
                tracing::info!("Probe server draining");
            })
            .await?;

        tracing::info!("Probe server stopped");
        Ok(())
    }
}

fn build_router<S: StatusSource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", any(probe_handler::<S>))
        .route("/{*path}", any(probe_handler::<S>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn probe_handler<S: StatusSource>(State(state): State<AppState<S>>) -> Response {
    let start = Instant::now();
    let outcome = within_deadline(&state.handler, state.request_timeout).await;
    metrics::record_probe(&outcome, start);

    let status = status_code(&outcome.verdict);
    tracing::debug!(
        status_code = status.as_u16(),
        message = %outcome.verdict.reason,
        "Health check response"
    );

    verdict_response(outcome.verdict)
}

/// Run one evaluation, cut off at `deadline` wherever it happens to be.
async fn within_deadline<S: StatusSource>(
    handler: &ProbeHandler<S>,
    deadline: Duration,
) -> ProbeOutcome {
    match tokio::time::timeout(deadline, handler.probe()).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!(
                timeout_secs = deadline.as_secs_f64(),
                "Request deadline exceeded"
            );
            ProbeOutcome {
                stage: ProbeStage::TimedOut,
                verdict: Verdict::unhealthy(PROBE_TIMED_OUT),
            }
        }
    }
}

pub fn status_code(verdict: &Verdict) -> StatusCode {
    if verdict.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Plain-text response carrying the reason verbatim.
pub fn verdict_response(verdict: Verdict) -> Response {
    (
        status_code(&verdict),
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        verdict.reason,
    )
        .into_response()
}
