//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, in-memory/file storage) and
//! serves the inventory API over HTTP.
//!
//! Adapter categories:
//! - `catalog`: Upstream product catalog REST client
//! - `http`: Inbound inventory API (axum)
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: Stock store with JSON snapshots

pub mod catalog;
pub mod http;
pub mod metrics;
pub mod persistence;
