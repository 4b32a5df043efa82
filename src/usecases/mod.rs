//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with the port interfaces.
//!
//! Use cases:
//! - `InventoryService`: get / set quantity / sell, each validated
//!   against the product catalog

pub mod inventory_service;

pub use inventory_service::InventoryService;
