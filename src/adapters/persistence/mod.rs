//! Persistence Adapters - Stock Storage
//!
//! Implements the StockStore port with an in-memory table guarded by
//! a single lock, optionally snapshotted to an atomic JSON file.

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStockStore;
pub use snapshot::{SnapshotFile, StockSnapshot};
