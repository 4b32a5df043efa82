//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ProductCatalog`: Upstream product existence checks
//! - `StockStore`: Inventory record persistence

pub mod catalog;
pub mod stock_store;

pub use catalog::{CatalogError, CatalogFailure, ProductCatalog};
pub use stock_store::{SaleOutcome, StockStore};
