//! Product summary as returned by the upstream catalog.
//!
//! Read-only and never persisted locally: it is fetched fresh for every
//! workflow call that needs to validate a product exists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::inventory::ProductId;

/// Catalog view of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
}
