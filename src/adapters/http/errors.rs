//! Error → HTTP response mapping.
//!
//! Client-fixable failures carry their message; everything else is
//! logged with its cause chain and returned as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::error::InventoryError;
use crate::domain::inventory::ProductId;

/// JSON error body: `{"error": code, "message": text}`.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Generic 500 that leaks no internal detail.
pub fn internal_error(message: &'static str) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
}

/// Map a workflow failure to its response, logging as appropriate.
pub fn inventory_error_response(
    operation: &'static str,
    product_id: ProductId,
    err: InventoryError,
) -> Response {
    match err {
        InventoryError::NotFound { .. } => {
            warn!(operation, product_id, error = %err, "Inventory not found");
            json_error(StatusCode::NOT_FOUND, "not_found", "inventory not found")
        }
        InventoryError::InsufficientStock { .. } => {
            warn!(operation, product_id, error = %err, "Business rule rejected request");
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", "insufficient stock")
        }
        InventoryError::InvalidQuantity(_) => {
            warn!(operation, product_id, error = %err, "Invalid quantity");
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
        }
        InventoryError::UpstreamUnavailable(_) | InventoryError::Store(_) => {
            error!(operation, product_id, error = ?anyhow::Error::from(err), "Inventory operation failed");
            internal_error("internal error while processing inventory")
        }
    }
}
