//! Inventory Routes - Request Boundary Handlers
//!
//! Thin translation from path/query inputs to `InventoryService`
//! calls, and from outcomes to status codes and envelopes. Each call
//! runs under the configured request deadline; when it fires, the
//! workflow future (including any pending catalog retry wait) is
//! dropped and the caller gets an opaque 500.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use super::envelope::InventoryDocument;
use super::errors::{internal_error, inventory_error_response, json_error};
use crate::adapters::metrics::MetricsRegistry;
use crate::domain::error::InventoryError;
use crate::domain::inventory::{InventoryRecord, ProductId};
use crate::ports::catalog::ProductCatalog;
use crate::ports::stock_store::StockStore;
use crate::usecases::InventoryService;

/// State shared by the inventory handlers.
pub struct AppState<C: ProductCatalog, S: StockStore> {
    /// Workflow.
    pub service: Arc<InventoryService<C, S>>,
    /// Request metrics, if enabled.
    pub metrics: Option<Arc<MetricsRegistry>>,
    /// Overall budget for one request.
    pub request_timeout: Duration,
}

impl<C: ProductCatalog, S: StockStore> Clone for AppState<C, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            metrics: self.metrics.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

/// `?cantidad=N`
#[derive(Debug, Deserialize)]
pub struct SetQuantityParams {
    /// New absolute quantity.
    pub cantidad: i64,
}

/// `?cantidadVendida=N`
#[derive(Debug, Deserialize)]
pub struct SellParams {
    /// Units sold.
    #[serde(rename = "cantidadVendida")]
    pub cantidad_vendida: i64,
}

/// `GET /inventarios/obtener/:product_id`
pub async fn get_inventory<C: ProductCatalog, S: StockStore>(
    State(state): State<AppState<C, S>>,
    path: Result<Path<ProductId>, PathRejection>,
) -> Response {
    let product_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    info!(product_id, "Inventory lookup requested");

    let service = Arc::clone(&state.service);
    respond(&state, "get", product_id, async move {
        service.get(product_id).await
    })
    .await
}

/// `PUT /inventarios/crearActualizar/:product_id?cantidad=N`
pub async fn set_quantity<C: ProductCatalog, S: StockStore>(
    State(state): State<AppState<C, S>>,
    path: Result<Path<ProductId>, PathRejection>,
    query: Result<Query<SetQuantityParams>, QueryRejection>,
) -> Response {
    let product_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    info!(product_id, cantidad = params.cantidad, "Updating inventory");

    let service = Arc::clone(&state.service);
    respond(&state, "set_quantity", product_id, async move {
        service.set_quantity(product_id, params.cantidad).await
    })
    .await
}

/// `PUT /inventarios/vender/:product_id?cantidadVendida=N`
pub async fn sell<C: ProductCatalog, S: StockStore>(
    State(state): State<AppState<C, S>>,
    path: Result<Path<ProductId>, PathRejection>,
    query: Result<Query<SellParams>, QueryRejection>,
) -> Response {
    let product_id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    info!(product_id, cantidad_vendida = params.cantidad_vendida, "Processing sale");

    let service = Arc::clone(&state.service);
    respond(&state, "sell", product_id, async move {
        service.sell(product_id, params.cantidad_vendida).await
    })
    .await
}

fn bad_request(message: String) -> Response {
    json_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

/// Run a workflow call under the deadline and render its outcome.
async fn respond<C, S, F>(
    state: &AppState<C, S>,
    operation: &'static str,
    product_id: ProductId,
    call: F,
) -> Response
where
    C: ProductCatalog,
    S: StockStore,
    F: Future<Output = Result<InventoryRecord, InventoryError>>,
{
    let started = Instant::now();

    let response = match tokio::time::timeout(state.request_timeout, call).await {
        Ok(Ok(record)) => (StatusCode::OK, Json(InventoryDocument::from(&record))).into_response(),
        Ok(Err(err)) => inventory_error_response(operation, product_id, err),
        Err(_) => {
            error!(
                operation,
                product_id,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Request deadline exceeded"
            );
            internal_error("internal error while processing inventory")
        }
    };

    if let Some(metrics) = &state.metrics {
        metrics.observe_request(operation, response.status().as_u16(), started.elapsed());
    }
    response
}
