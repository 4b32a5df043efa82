//! Product Catalog Port - Upstream Product Lookup Interface
//!
//! The inventory workflow only needs one thing from the catalog
//! service: confirmation that a product exists, with its summary.
//! Retries happen inside the adapter; callers see a single terminal
//! failure once attempts are exhausted.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::inventory::ProductId;
use crate::domain::product::ProductSummary;

/// Why the last catalog attempt failed.
///
/// Kept for logs only. A 404 from the catalog and a network timeout
/// produce the same `CatalogError`, so callers cannot tell a missing
/// product from an unreachable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogFailure {
    /// Upstream answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// Connection, timeout or other transport error.
    #[error("transport error: {0}")]
    Transport(String),
    /// Body did not match the expected envelope.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Terminal catalog failure after all attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product {product_id} lookup failed after {attempts} attempt(s): {cause}")]
pub struct CatalogError {
    /// Product that was looked up.
    pub product_id: ProductId,
    /// Attempts performed before giving up.
    pub attempts: u32,
    /// Cause of the final attempt's failure.
    pub cause: CatalogFailure,
}

/// Trait for product catalog providers.
#[async_trait]
pub trait ProductCatalog: Send + Sync + 'static {
    /// Fetch a product summary, retrying per the adapter's policy.
    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductSummary, CatalogError>;
}
