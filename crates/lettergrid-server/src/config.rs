// crates/lettergrid-server/src/config.rs
// ============================================================================
// Module: Server Configuration
// Description: TOML configuration loading and fail-closed validation.
// Purpose: Resolve the bind address, base URL, and store backend settings.
// Dependencies: lettergrid-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration comes from a TOML file (`lettergrid.toml` by default, the
//! `LETTERGRID_CONFIG` environment variable or a CLI flag override the path).
//! Loading is fail-closed: unknown store types, an unparseable bind address,
//! an oversized file, or a sqlite store without a path all reject the whole
//! configuration instead of falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use lettergrid_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "lettergrid.toml";
/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "LETTERGRID_CONFIG";
/// Maximum accepted configuration file size in bytes.
const MAX_CONFIG_BYTES: u64 = 1024 * 1024;
/// Default bind address when the file omits one.
const DEFAULT_BIND: &str = "127.0.0.1:8000";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Any validation failure rejects the whole configuration; there is no
///   partial fallback.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file could not be parsed as TOML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration content failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Volatile in-memory store (tests and demos).
    #[default]
    Memory,
    /// Durable `SQLite` store.
    Sqlite,
}

/// Store backend configuration.
///
/// # Invariants
/// - `path` is required when `store_type` is [`StoreType::Sqlite`] and
///   rejected otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Selected backend.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database file path for the `SQLite` backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Builds the `SQLite` store configuration when that backend is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the path is missing.
    pub fn sqlite_config(&self) -> Result<SqliteStoreConfig, ConfigError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("sqlite store requires store.path".to_string()))?;
        Ok(SqliteStoreConfig::for_path(path.clone()))
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address in `host:port` form.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Public base URL used when no forwarding headers are present.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_base_url: None,
        }
    }
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Top-level provider configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store backend settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl ProviderConfig {
    /// Loads and validates configuration from the given file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds {MAX_CONFIG_BYTES} bytes"
            )));
        }
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let config: Self = toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the default path or `LETTERGRID_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`Self::load`].
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::load(&path)
    }

    /// Validates the configuration, rejecting inconsistent settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unparseable bind address, a
    /// sqlite store without a path, or a path on the memory store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if let Some(base) = &self.server.public_base_url
            && base.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "server.public_base_url must not be blank".to_string(),
            ));
        }
        match self.store.store_type {
            StoreType::Sqlite => {
                self.store.sqlite_config()?;
            }
            StoreType::Memory => {
                if self.store.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "store.path is only valid for the sqlite store".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("unparseable bind address: {}", self.server.bind))
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
