//! Inventario Service - Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml (path from first CLI arg) + env overrides + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create metrics registry
//! 4. Create CatalogClient (shared secret + fixed-delay retry)
//! 5. Create stock store (restoring the snapshot when configured)
//! 6. Wire InventoryService and the HTTP router
//! 7. Serve until SIGINT → readiness 503 → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use inventario_service::adapters::catalog::{CatalogClient, CatalogClientConfig};
use inventario_service::adapters::http::{build_router, ApiKeyGuard, AppState};
use inventario_service::adapters::metrics::{HealthState, MetricsRegistry};
use inventario_service::adapters::persistence::MemoryStockStore;
use inventario_service::config;
use inventario_service::usecases::InventoryService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.bind_address,
        catalog = %config.catalog.base_url,
        max_attempts = config.catalog.max_attempts,
        retry_delay_ms = config.catalog.retry_delay_ms,
        persistent = config.persistence.data_dir.is_some(),
        "Configuration loaded, starting inventory service"
    );

    // ── 3. Metrics ──────────────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };

    // ── 4. Catalog client ───────────────────────────────────
    let mut catalog = CatalogClient::new(CatalogClientConfig::from_config(
        &config.catalog,
        &config.auth,
    ))
    .context("Failed to create catalog client")?;
    if let Some(m) = &metrics {
        catalog = catalog.with_metrics(Arc::clone(m));
    }
    let catalog = Arc::new(catalog);

    // ── 5. Stock store ──────────────────────────────────────
    let store = Arc::new(match &config.persistence.data_dir {
        Some(dir) => MemoryStockStore::with_snapshot(dir)
            .await
            .context("Failed to open stock snapshot")?,
        None => {
            warn!("No persistence.data_dir configured, stock is kept in memory only");
            MemoryStockStore::new()
        }
    });

    // ── 6. Workflow + router ────────────────────────────────
    let service = Arc::new(InventoryService::new(catalog, Arc::clone(&store)));
    let state = AppState {
        service,
        metrics: metrics.clone(),
        request_timeout: config.server.request_timeout(),
    };
    let health = HealthState::new(store, metrics);
    let app = build_router(
        state,
        ApiKeyGuard::new(config.auth.api_key.as_str()),
        health.clone(),
    );

    // ── 7. Serve until SIGINT ───────────────────────────────
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Inventory API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for SIGINT");
            }
            info!("SIGINT received, initiating graceful shutdown");
            health.begin_shutdown();
        })
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}
