//! Inventory HTTP API Adapter (Request Boundary)
//!
//! Serves the inventory operations over JSON/HTTP:
//! - `GET /inventarios/obtener/:product_id`
//! - `PUT /inventarios/crearActualizar/:product_id?cantidad=N`
//! - `PUT /inventarios/vender/:product_id?cantidadVendida=N`
//!
//! Sub-modules:
//! - `auth`: `x-api-key` guard middleware
//! - `envelope`: response document types
//! - `errors`: failure → status mapping
//! - `routes`: handlers

pub mod auth;
pub mod envelope;
pub mod errors;
pub mod routes;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use axum::Router;

use crate::adapters::metrics::{health_router, HealthState};
use crate::ports::catalog::ProductCatalog;
use crate::ports::stock_store::StockStore;

pub use auth::ApiKeyGuard;
pub use envelope::InventoryDocument;
pub use routes::AppState;

/// Authenticated inventory routes, nested under `/inventarios`.
pub fn inventory_router<C: ProductCatalog, S: StockStore>(
    state: AppState<C, S>,
    guard: ApiKeyGuard,
) -> Router {
    let routes = Router::new()
        .route("/obtener/:product_id", get(routes::get_inventory::<C, S>))
        .route("/crearActualizar/:product_id", put(routes::set_quantity::<C, S>))
        .route("/vender/:product_id", put(routes::sell::<C, S>))
        .route_layer(from_fn_with_state(guard, auth::require_api_key))
        .with_state(state);

    Router::new().nest("/inventarios", routes)
}

/// Full application router: inventory API plus health and metrics.
pub fn build_router<C: ProductCatalog, S: StockStore>(
    state: AppState<C, S>,
    guard: ApiKeyGuard,
    health: HealthState,
) -> Router {
    inventory_router(state, guard).merge(health_router(health))
}
