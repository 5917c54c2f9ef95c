// crates/lettergrid-server/src/config/tests.rs
// ============================================================================
// Module: Server Configuration Unit Tests
// Description: TOML parsing and fail-closed validation coverage.
// Purpose: Ensure invalid configuration rejects instead of falling back.
// Dependencies: lettergrid-server, tempfile, toml
// ============================================================================

//! ## Overview
//! Exercises configuration loading: defaults for a missing file, strict
//! rejection of inconsistent store settings, and bind address validation.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only validation helpers use panic-based assertions for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use tempfile::TempDir;

use super::ConfigError;
use super::ProviderConfig;
use super::StoreType;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn load_from(contents: &str) -> Result<ProviderConfig, ConfigError> {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("lettergrid.toml");
    fs::write(&path, contents).expect("write config");
    ProviderConfig::load(&path)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let config = ProviderConfig::load(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.store.store_type, StoreType::Memory);
    assert_eq!(config.server.bind, "127.0.0.1:8000");
}

#[test]
fn parses_a_sqlite_store() {
    let config = load_from(
        r#"
        [server]
        bind = "0.0.0.0:9000"
        public_base_url = "https://ap.example.org"

        [store]
        type = "sqlite"
        path = "/var/lib/lettergrid/provider.db"
        "#,
    )
    .expect("valid config");
    assert_eq!(config.store.store_type, StoreType::Sqlite);
    assert_eq!(config.bind_addr().expect("addr").port(), 9000);
    assert_eq!(config.server.public_base_url.as_deref(), Some("https://ap.example.org"));
}

#[test]
fn sqlite_without_a_path_is_rejected() {
    let err = load_from("[store]\ntype = \"sqlite\"\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn memory_with_a_path_is_rejected() {
    let err =
        load_from("[store]\ntype = \"memory\"\npath = \"x.db\"\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unknown_store_types_are_rejected() {
    let err = load_from("[store]\ntype = \"redis\"\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn unparseable_bind_addresses_are_rejected() {
    let err = load_from("[server]\nbind = \"not-an-address\"\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn blank_base_urls_are_rejected() {
    let err = load_from("[server]\npublic_base_url = \"  \"\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}
