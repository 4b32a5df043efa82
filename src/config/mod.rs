//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides for secrets and the catalog URL.
//! Everything is passed into constructors at startup; nothing reads
//! configuration from global state.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub service: ServiceConfig,
  /// Inbound HTTP server.
  #[serde(default)]
  pub server: ServerConfig,
  /// Shared-secret authentication for callers.
  pub auth: AuthConfig,
  /// Upstream product catalog.
  pub catalog: CatalogConfig,
  /// Stock persistence.
  #[serde(default)]
  pub persistence: PersistenceConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  #[serde(default = "default_service_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Inbound HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Listen address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Overall budget for a single request, including catalog retries.
  #[serde(default = "default_request_timeout")]
  pub request_timeout_ms: u64,
}

/// Caller authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
  /// Expected `x-api-key` value. Overridden by `INVENTARIO_API_KEY`.
  #[serde(default)]
  pub api_key: String,
}

/// Product catalog client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
  /// Base URL; product lookups go to `{base_url}/{product_id}`.
  /// Overridden by `PRODUCTOS_URL`.
  #[serde(default)]
  pub base_url: String,
  /// Secret sent upstream. Falls back to `auth.api_key` when unset.
  pub api_key: Option<String>,
  /// Total attempts per lookup (first try included).
  #[serde(default = "default_max_attempts")]
  pub max_attempts: u32,
  /// Fixed wait between attempts.
  #[serde(default = "default_retry_delay")]
  pub retry_delay_ms: u64,
  /// Per-attempt connect + read timeout.
  #[serde(default = "default_catalog_timeout")]
  pub timeout_ms: u64,
}

/// Persistence configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistenceConfig {
  /// Directory for the stock snapshot. In-memory only when unset.
  pub data_dir: Option<String>,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Expose `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl ServerConfig {
  /// Request budget as a `Duration`.
  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }
}

impl CatalogConfig {
  /// Secret to present upstream, defaulting to the inbound key.
  pub fn effective_api_key<'a>(&'a self, auth: &'a AuthConfig) -> &'a str {
    self.api_key.as_deref().unwrap_or(&auth.api_key)
  }
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: default_service_name(),
      log_level: default_log_level(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      request_timeout_ms: default_request_timeout(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
    }
  }
}

// Default value functions for serde

fn default_service_name() -> String {
  "inventario-service".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_request_timeout() -> u64 {
  10_000
}

fn default_max_attempts() -> u32 {
  3
}

fn default_retry_delay() -> u64 {
  1_000
}

fn default_catalog_timeout() -> u64 {
  5_000
}

fn default_true() -> bool {
  true
}
