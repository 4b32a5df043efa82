//! In-Memory Stock Store - Concrete Adapter for the StockStore Port
//!
//! Holds the stock table behind a single `tokio::sync::RwLock`. Every
//! mutation runs under the write lock, which makes `upsert_quantity`
//! and `try_sell` atomic per product. When a `SnapshotFile` is
//! attached, the table is persisted before the lock is released and
//! the change is rolled back if the write fails. Snapshotted mutations
//! run on a detached task, so a caller that gives up mid-write (request
//! deadline) never leaves memory ahead of the file.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn, Instrument};

use super::snapshot::{SnapshotFile, StockSnapshot, SNAPSHOT_VERSION};
use crate::domain::inventory::{InventoryRecord, ProductId, Quantity, RecordId};
use crate::ports::stock_store::{SaleOutcome, StockStore};

/// Records indexed by id and by product.
#[derive(Debug)]
struct Table {
    next_id: RecordId,
    by_id: BTreeMap<RecordId, InventoryRecord>,
    by_product: HashMap<ProductId, RecordId>,
}

impl Table {
    fn new() -> Self {
        Self {
            next_id: 1,
            by_id: BTreeMap::new(),
            by_product: HashMap::new(),
        }
    }

    fn from_snapshot(snapshot: StockSnapshot) -> Result<Self> {
        let mut table = Self::new();
        for record in snapshot.records {
            let Some(id) = record.id else {
                bail!("Snapshot record for product {} has no id", record.product_id);
            };
            if table.by_product.insert(record.product_id, id).is_some() {
                bail!("Snapshot has duplicate records for product {}", record.product_id);
            }
            table.next_id = table.next_id.max(id + 1);
            table.by_id.insert(id, record);
        }
        table.next_id = table.next_id.max(snapshot.next_id);
        Ok(table)
    }

    fn to_snapshot(&self) -> StockSnapshot {
        StockSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            next_id: self.next_id,
            records: self.by_id.values().cloned().collect(),
        }
    }

    fn get_by_product(&self, product_id: ProductId) -> Option<&InventoryRecord> {
        self.by_product
            .get(&product_id)
            .and_then(|id| self.by_id.get(id))
    }

    /// Assign an id if unset, then write the record and its index entry.
    ///
    /// Returns the previous version (if any) for rollback.
    fn put(&mut self, mut record: InventoryRecord) -> Result<(InventoryRecord, Option<InventoryRecord>)> {
        let id = match record.id {
            None => {
                if let Some(existing) = self.by_product.get(&record.product_id) {
                    bail!(
                        "Product {} already has inventory record {}",
                        record.product_id,
                        existing
                    );
                }
                let id = self.next_id;
                self.next_id += 1;
                record.id = Some(id);
                id
            }
            Some(id) => {
                if !self.by_id.contains_key(&id) {
                    bail!("No inventory record with id {id}");
                }
                if let Some(owner) = self.by_product.get(&record.product_id) {
                    if *owner != id {
                        bail!(
                            "Product {} already has inventory record {}",
                            record.product_id,
                            owner
                        );
                    }
                }
                id
            }
        };

        let previous = self.by_id.insert(id, record.clone());
        if let Some(prev) = &previous {
            if prev.product_id != record.product_id {
                self.by_product.remove(&prev.product_id);
            }
        }
        self.by_product.insert(record.product_id, id);
        Ok((record, previous))
    }

    /// Undo a `put`.
    fn restore(&mut self, written: &InventoryRecord, previous: Option<InventoryRecord>) {
        let Some(id) = written.id else { return };
        self.by_product.remove(&written.product_id);
        match previous {
            Some(prev) => {
                self.by_product.insert(prev.product_id, id);
                self.by_id.insert(id, prev);
            }
            None => {
                self.by_id.remove(&id);
            }
        }
    }
}

/// Table plus optional snapshot, shared with detached mutations.
struct Inner {
    table: RwLock<Table>,
    snapshot: Option<SnapshotFile>,
}

impl Inner {
    /// Write `record` and persist, rolling back on snapshot failure.
    ///
    /// Caller holds the write lock.
    async fn commit(&self, table: &mut Table, record: InventoryRecord) -> Result<InventoryRecord> {
        let (written, previous) = table.put(record)?;

        if let Some(file) = &self.snapshot {
            if let Err(e) = file.save(&table.to_snapshot()).await {
                warn!(error = %e, product_id = written.product_id, "Snapshot failed, rolling back");
                table.restore(&written, previous);
                return Err(e);
            }
        }

        Ok(written)
    }

    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord> {
        let mut table = self.table.write().await;
        self.commit(&mut table, record).await
    }

    async fn upsert_quantity(&self, product_id: ProductId, quantity: Quantity) -> Result<InventoryRecord> {
        let mut table = self.table.write().await;
        let mut record = table
            .get_by_product(product_id)
            .cloned()
            .unwrap_or_else(|| InventoryRecord::empty(product_id));
        record.set_quantity(quantity);
        self.commit(&mut table, record).await
    }

    async fn try_sell(&self, product_id: ProductId, quantity: Quantity) -> Result<SaleOutcome> {
        let mut table = self.table.write().await;
        let Some(mut record) = table.get_by_product(product_id).cloned() else {
            return Ok(SaleOutcome::NoRecord);
        };
        if record.apply_sale(quantity).is_err() {
            return Ok(SaleOutcome::Insufficient {
                available: record.quantity,
            });
        }
        let saved = self.commit(&mut table, record).await?;
        Ok(SaleOutcome::Sold(saved))
    }
}

/// Stock store keeping all records in memory, optionally snapshotted.
pub struct MemoryStockStore {
    inner: Arc<Inner>,
}

impl MemoryStockStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self::from_parts(Table::new(), None)
    }

    /// Create a store persisted to `{data_dir}/inventory.json`,
    /// restoring any existing snapshot.
    pub async fn with_snapshot(data_dir: &str) -> Result<Self> {
        let file = SnapshotFile::new(data_dir).await?;
        let table = match file.load().await? {
            Some(snapshot) => Table::from_snapshot(snapshot)?,
            None => Table::new(),
        };

        info!(
            path = %file.path().display(),
            records = table.by_id.len(),
            "Stock store ready"
        );

        Ok(Self::from_parts(table, Some(file)))
    }

    fn from_parts(table: Table, snapshot: Option<SnapshotFile>) -> Self {
        Self {
            inner: Arc::new(Inner {
                table: RwLock::new(table),
                snapshot,
            }),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.table.read().await.by_id.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run a mutation to completion even if the caller is dropped.
    ///
    /// Without a snapshot the mutation has no await point after the
    /// lock is taken, so it runs inline. With one, it runs on its own
    /// task: memory and `inventory.json` always change together.
    async fn mutate<T, F, Fut>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Inner>) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        if inner.snapshot.is_none() {
            return op(inner).await;
        }
        tokio::spawn(op(inner).in_current_span())
            .await
            .context("Stock mutation task failed")?
    }
}

impl Default for MemoryStockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StockStore for MemoryStockStore {
    async fn find_by_product_id(&self, product_id: ProductId) -> Result<Option<InventoryRecord>> {
        Ok(self.inner.table.read().await.get_by_product(product_id).cloned())
    }

    #[instrument(skip(self))]
    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord> {
        self.mutate(move |inner| async move { inner.save(record).await })
            .await
    }

    #[instrument(skip(self))]
    async fn upsert_quantity(&self, product_id: ProductId, quantity: Quantity) -> Result<InventoryRecord> {
        self.mutate(move |inner| async move { inner.upsert_quantity(product_id, quantity).await })
            .await
    }

    #[instrument(skip(self))]
    async fn try_sell(&self, product_id: ProductId, quantity: Quantity) -> Result<SaleOutcome> {
        self.mutate(move |inner| async move { inner.try_sell(product_id, quantity).await })
            .await
    }

    async fn is_healthy(&self) -> bool {
        match &self.inner.snapshot {
            Some(file) => file.is_healthy().await,
            None => true,
        }
    }
}
