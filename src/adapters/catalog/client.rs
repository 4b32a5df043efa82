//! Catalog HTTP Client - Product Lookup with Fixed-Delay Retry
//!
//! Wraps reqwest with the shared-secret header, a per-attempt timeout
//! and a [`RetryPolicy`]. Any failure (non-2xx, transport, malformed
//! body) is retried identically; exhausting attempts yields a single
//! `CatalogError` carrying the last cause.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, instrument};

use super::retry::{Exhausted, RetryPolicy};
use super::types::ProductEnvelope;
use crate::adapters::metrics::MetricsRegistry;
use crate::config::{AuthConfig, CatalogConfig};
use crate::domain::inventory::ProductId;
use crate::domain::product::ProductSummary;
use crate::ports::catalog::{CatalogError, CatalogFailure, ProductCatalog};

/// Header carrying the shared secret, both inbound and upstream.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for the catalog HTTP client.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL; lookups hit `{base_url}/{product_id}`.
    pub base_url: String,
    /// Secret sent in `x-api-key`.
    pub api_key: String,
    /// Per-attempt connect + read timeout.
    pub timeout: Duration,
    /// Attempt budget and inter-attempt delay.
    pub retry: RetryPolicy,
}

impl CatalogClientConfig {
    /// Build from the service configuration sections.
    pub fn from_config(catalog: &CatalogConfig, auth: &AuthConfig) -> Self {
        Self {
            base_url: catalog.base_url.clone(),
            api_key: catalog.effective_api_key(auth).to_string(),
            timeout: Duration::from_millis(catalog.timeout_ms),
            retry: RetryPolicy::fixed(
                catalog.max_attempts,
                Duration::from_millis(catalog.retry_delay_ms),
            ),
        }
    }
}

/// HTTP client for the upstream product catalog.
pub struct CatalogClient {
    /// Underlying HTTP client.
    http: Client,
    /// Client configuration.
    config: CatalogClientConfig,
    /// Optional attempt counters.
    metrics: Option<Arc<MetricsRegistry>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogClientConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config,
            metrics: None,
        })
    }

    /// Record attempt outcomes in the given registry.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn product_url(&self, product_id: ProductId) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            product_id
        )
    }

    fn observe(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_catalog_attempt(outcome);
        }
    }

    /// One lookup attempt, no retry.
    async fn attempt(&self, product_id: ProductId) -> Result<ProductSummary, CatalogFailure> {
        let response = self
            .http
            .get(self.product_url(product_id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| CatalogFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFailure::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogFailure::Transport(e.to_string()))?;

        serde_json::from_slice::<ProductEnvelope>(&body)
            .map_err(|e| CatalogFailure::Decode(e.to_string()))?
            .into_summary()
            .map_err(CatalogFailure::Decode)
    }
}

#[async_trait]
impl ProductCatalog for CatalogClient {
    #[instrument(skip(self))]
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductSummary, CatalogError> {
        debug!("Looking up product in catalog");

        let result = self
            .config
            .retry
            .run("catalog_lookup", |_| async move {
                let outcome = self.attempt(product_id).await;
                self.observe(if outcome.is_ok() { "success" } else { "failure" });
                outcome
            })
            .await;

        match result {
            Ok(product) => {
                info!(name = %product.name, "Product found in catalog");
                Ok(product)
            }
            Err(Exhausted {
                attempts,
                last_error,
            }) => {
                self.observe("exhausted");
                error!(attempts, cause = %last_error, "Catalog lookup exhausted all attempts");
                Err(CatalogError {
                    product_id,
                    attempts,
                    cause: last_error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use rust_decimal_macros::dec;

    /// Stub catalog: fails the first `fail_first` calls with 503.
    #[derive(Clone)]
    struct Stub {
        calls: Arc<AtomicU32>,
        fail_first: u32,
    }

    async fn lookup(
        State(stub): State<Stub>,
        Path(id): Path<i64>,
        headers: HeaderMap,
    ) -> Result<Json<serde_json::Value>, StatusCode> {
        let n = stub.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some("upstream-key") {
            return Err(StatusCode::UNAUTHORIZED);
        }
        if n <= stub.fail_first {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        if id == 404 {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Json(serde_json::json!({
            "data": { "id": id, "attributes": { "name": "Teclado", "price": 25.5 } }
        })))
    }

    async fn spawn_stub(fail_first: u32) -> (String, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route("/productos/:id", get(lookup))
            .with_state(Stub {
                calls: Arc::clone(&calls),
                fail_first,
            });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/productos"), calls)
    }

    fn client(base_url: String, max_attempts: u32) -> CatalogClient {
        CatalogClient::new(CatalogClientConfig {
            base_url,
            api_key: "upstream-key".to_string(),
            timeout: Duration::from_secs(2),
            retry: RetryPolicy::fixed(max_attempts, Duration::from_millis(10)),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_product_success() {
        let (url, calls) = spawn_stub(0).await;
        let product = client(url, 3).fetch_product(42).await.unwrap();
        assert_eq!(product.id, 42);
        assert_eq!(product.name, "Teclado");
        assert_eq!(product.price, dec!(25.5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let (url, calls) = spawn_stub(2).await;
        let product = client(url, 3).fetch_product(7).await.unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_retried_then_exhausted() {
        let (url, calls) = spawn_stub(0).await;
        let err = client(url, 3).fetch_product(404).await.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.cause, CatalogFailure::Status(404));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_reports_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/productos"), 2)
            .fetch_product(1)
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 2);
        assert!(matches!(err.cause, CatalogFailure::Transport(_)));
    }

    #[tokio::test]
    async fn test_metrics_count_attempts() {
        let (url, _calls) = spawn_stub(1).await;
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let client = client(url, 3).with_metrics(Arc::clone(&metrics));
        client.fetch_product(5).await.unwrap();

        assert_eq!(metrics.catalog_attempts.with_label_values(&["failure"]).get(), 1);
        assert_eq!(metrics.catalog_attempts.with_label_values(&["success"]).get(), 1);
    }

    #[test]
    fn test_product_url_trims_trailing_slash() {
        let client = client("http://catalog/productos/".to_string(), 1);
        assert_eq!(client.product_url(9), "http://catalog/productos/9");
    }
}
