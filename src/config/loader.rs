//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and providing clear error messages
//! for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Env var overriding `auth.api_key`.
pub const API_KEY_ENV: &str = "INVENTARIO_API_KEY";
/// Env var overriding `catalog.base_url`.
pub const CATALOG_URL_ENV: &str = "PRODUCTOS_URL";

/// Load, override from the environment, and validate configuration.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config = parse_config(&content)?;
  apply_env_overrides(&mut config, |key| std::env::var(key).ok());
  validate_config(&config)?;

  Ok(config)
}

/// Parse TOML text into an `AppConfig` without validation.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  toml::from_str(content).context("Failed to parse config.toml")
}

/// Apply environment overrides using the given lookup.
///
/// Empty values are ignored so an exported-but-blank variable does not
/// wipe a configured secret.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
    config.auth.api_key = key;
  }
  if let Some(url) = lookup(CATALOG_URL_ENV).filter(|v| !v.is_empty()) {
    config.catalog.base_url = url;
  }
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.auth.api_key.is_empty(),
    "auth.api_key must be set (or {API_KEY_ENV})"
  );
  anyhow::ensure!(
    !config.catalog.base_url.is_empty(),
    "catalog.base_url must be set (or {CATALOG_URL_ENV})"
  );
  anyhow::ensure!(
    config.catalog.base_url.starts_with("http://")
      || config.catalog.base_url.starts_with("https://"),
    "catalog.base_url must be an http(s) URL, got {}",
    config.catalog.base_url
  );
  anyhow::ensure!(
    config.catalog.max_attempts >= 1,
    "catalog.max_attempts must be at least 1, got {}",
    config.catalog.max_attempts
  );
  anyhow::ensure!(
    config.catalog.timeout_ms > 0,
    "catalog.timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.server.request_timeout_ms > 0,
    "server.request_timeout_ms must be positive"
  );
  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );

  Ok(())
}
