//! Stock Store Port - Inventory Persistence Interface
//!
//! Key-value persistence of `InventoryRecord`s keyed by product id.
//! Besides point lookup and save, the port exposes two atomic
//! per-product operations so concurrent writers for the same product
//! cannot interleave a read and a write.

use async_trait::async_trait;

use crate::domain::inventory::{InventoryRecord, ProductId, Quantity};

/// Result of an atomic conditional decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Stock was decremented; carries the saved record.
    Sold(InventoryRecord),
    /// No record exists for the product.
    NoRecord,
    /// Not enough stock; nothing was written.
    Insufficient {
        /// Units on hand at the time of the check.
        available: Quantity,
    },
}

/// Trait for inventory persistence providers.
#[async_trait]
pub trait StockStore: Send + Sync + 'static {
    /// Look up the record for a product.
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> anyhow::Result<Option<InventoryRecord>>;

    /// Insert (id unset: a new id is assigned) or overwrite by id.
    ///
    /// Last writer wins; there is no concurrency token.
    async fn save(&self, record: InventoryRecord) -> anyhow::Result<InventoryRecord>;

    /// Atomically create-or-overwrite the quantity for a product.
    async fn upsert_quantity(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> anyhow::Result<InventoryRecord>;

    /// Atomically decrement stock if at least `quantity` units are on hand.
    async fn try_sell(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> anyhow::Result<SaleOutcome>;

    /// Check if the store can serve traffic.
    async fn is_healthy(&self) -> bool;
}
