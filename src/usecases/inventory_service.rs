//! Inventory Service - Stock Workflow with Upstream Validation
//!
//! Every operation first confirms the product with the catalog, then
//! reads or mutates local stock:
//! - `get`: catalog check, then point lookup
//! - `set_quantity`: catalog check, then atomic create-or-overwrite
//! - `sell`: catalog check, then atomic conditional decrement
//!
//! Catalog failures map differently per path: `get` and `set_quantity`
//! surface `UpstreamUnavailable`, while `sell` reports `NotFound`.
//! Nothing is written unless the catalog lookup succeeded.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::error::InventoryError;
use crate::domain::inventory::{parse_quantity, InventoryRecord, ProductId};
use crate::ports::catalog::ProductCatalog;
use crate::ports::stock_store::{SaleOutcome, StockStore};

/// Orchestrates catalog validation and stock persistence.
pub struct InventoryService<C: ProductCatalog, S: StockStore> {
    /// Catalog port.
    catalog: Arc<C>,
    /// Persistence port.
    store: Arc<S>,
}

impl<C: ProductCatalog, S: StockStore> Clone for InventoryService<C, S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            store: Arc::clone(&self.store),
        }
    }
}

impl<C: ProductCatalog, S: StockStore> InventoryService<C, S> {
    /// Create a new inventory service.
    pub fn new(catalog: Arc<C>, store: Arc<S>) -> Self {
        Self { catalog, store }
    }

    /// Shared handle to the stock store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Current stock for a product.
    #[instrument(skip(self))]
    pub async fn get(&self, product_id: ProductId) -> Result<InventoryRecord, InventoryError> {
        info!("Querying inventory");

        self.catalog
            .fetch_product(product_id)
            .await
            .map_err(InventoryError::UpstreamUnavailable)?;

        match self.store.find_by_product_id(product_id).await? {
            Some(record) => Ok(record),
            None => {
                warn!("Inventory not found");
                Err(InventoryError::NotFound {
                    product_id,
                    reason: "no inventory record",
                })
            }
        }
    }

    /// Set the absolute stock level, creating the record if needed.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        new_quantity: i64,
    ) -> Result<InventoryRecord, InventoryError> {
        let quantity = parse_quantity(new_quantity).inspect_err(|_| {
            warn!("Rejected invalid quantity");
        })?;

        self.catalog
            .fetch_product(product_id)
            .await
            .map_err(InventoryError::UpstreamUnavailable)?;

        let saved = self.store.upsert_quantity(product_id, quantity).await?;

        info!(
            record_id = ?saved.id,
            quantity = saved.quantity,
            "Inventory updated"
        );
        Ok(saved)
    }

    /// Decrement stock by `quantity_sold`, refusing to oversell.
    #[instrument(skip(self))]
    pub async fn sell(
        &self,
        product_id: ProductId,
        quantity_sold: i64,
    ) -> Result<InventoryRecord, InventoryError> {
        let quantity = parse_quantity(quantity_sold).inspect_err(|_| {
            warn!("Rejected invalid sale quantity");
        })?;

        if let Err(e) = self.catalog.fetch_product(product_id).await {
            warn!(cause = %e, "Product not found for sale");
            return Err(InventoryError::NotFound {
                product_id,
                reason: "product not found",
            });
        }

        match self.store.try_sell(product_id, quantity).await? {
            SaleOutcome::Sold(record) => {
                info!(remaining = record.quantity, "Sale registered");
                Ok(record)
            }
            SaleOutcome::NoRecord => {
                warn!("No inventory for this product");
                Err(InventoryError::NotFound {
                    product_id,
                    reason: "no inventory for this product",
                })
            }
            SaleOutcome::Insufficient { available } => {
                warn!(requested = quantity, available, "Insufficient stock");
                Err(InventoryError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available,
                })
            }
        }
    }
}
