//! Product Catalog Adapter
//!
//! Implements the `ProductCatalog` port over the upstream product
//! service's REST API.
//!
//! Sub-modules:
//! - `client`: reqwest client with shared-secret header and retries
//! - `retry`: fixed-delay, bounded-attempt retry policy
//! - `types`: response envelope definitions

pub mod client;
pub mod retry;
pub mod types;

pub use client::{CatalogClient, CatalogClientConfig, API_KEY_HEADER};
pub use retry::RetryPolicy;
