//! Health and Metrics Routes - Liveness, Readiness, Prometheus
//!
//! Exposes /live, /ready and /metrics via axum 0.7 for container
//! health checks and scraping. These routes are not authenticated.
//! Readiness depends on the stock store and flips to 503 once
//! graceful shutdown starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::error;

use super::prometheus::MetricsRegistry;
use crate::ports::stock_store::StockStore;

/// Shared health state polled by readiness probes.
#[derive(Clone)]
pub struct HealthState {
    /// Cleared when shutdown begins.
    pub accepting: Arc<AtomicBool>,
    /// Store whose health gates readiness.
    pub store: Arc<dyn StockStore>,
    /// Registry rendered at /metrics, if enabled.
    pub metrics: Option<Arc<MetricsRegistry>>,
}

impl HealthState {
    /// Create a new health state (accepting traffic).
    pub fn new(store: Arc<dyn StockStore>, metrics: Option<Arc<MetricsRegistry>>) -> Self {
        Self {
            accepting: Arc::new(AtomicBool::new(true)),
            store,
            metrics,
        }
    }

    /// Stop reporting ready (graceful shutdown).
    pub fn begin_shutdown(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }

    /// Check if the service is ready to serve traffic.
    pub async fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed) && self.store.is_healthy().await
    }
}

/// Router serving /live, /ready and /metrics.
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only if accepting traffic and the store is healthy.
async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.is_ready().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

/// Prometheus text exposition.
async fn metrics(State(state): State<HealthState>) -> impl IntoResponse {
    let Some(registry) = &state.metrics else {
        return (StatusCode::NOT_FOUND, String::new());
    };
    match registry.render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
