//! Failure taxonomy surfaced by the inventory workflow.
//!
//! The request boundary maps each variant to exactly one HTTP status;
//! see `adapters::http::errors`.

use thiserror::Error;

use super::inventory::{ProductId, Quantity};
use crate::ports::catalog::CatalogError;

/// Errors returned by `InventoryService` operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The catalog could not confirm the product (get / set paths).
    #[error("product catalog unavailable")]
    UpstreamUnavailable(#[source] CatalogError),

    /// No local stock record, or the catalog lookup failed on the sell path.
    #[error("inventory not found for product {product_id}: {reason}")]
    NotFound {
        product_id: ProductId,
        reason: &'static str,
    },

    /// Selling more units than are in stock.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: Quantity,
        available: Quantity,
    },

    /// Caller supplied a negative or out-of-range quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl InventoryError {
    /// Domain validation failures the caller can fix by changing input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientStock { .. } | Self::InvalidQuantity(_)
        )
    }
}
