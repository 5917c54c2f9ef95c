// crates/lettergrid-store-sqlite/src/lib.rs
// ============================================================================
// Module: Lettergrid SQLite Store Library
// Description: Durable InstanceStore implementation backed by SQLite.
// Purpose: Provide the production persistence backend for the provider.
// Dependencies: lettergrid-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate implements the [`lettergrid_core::InstanceStore`] contract on
//! top of `SQLite`. Instance records are stored as JSON payloads keyed by
//! instance identifier; activity events live in an append-only table. The
//! on-disk layout is entirely this crate's concern.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteInstanceStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
