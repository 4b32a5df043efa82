//! Domain layer - Core inventory models and rules.
//!
//! Pure types with no I/O (hexagonal architecture inner ring).
//! The oversell invariant lives here, on `InventoryRecord`.

pub mod error;
pub mod inventory;
pub mod product;

pub use error::InventoryError;
pub use inventory::{InventoryRecord, ProductId, Quantity, RecordId};
pub use product::ProductSummary;
