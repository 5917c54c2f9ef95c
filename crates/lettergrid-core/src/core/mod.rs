// crates/lettergrid-core/src/core/mod.rs
// ============================================================================
// Module: Lettergrid Domain Model
// Description: Identifiers, game configuration, instances, analytics, and time.
// Purpose: Group the pure domain types used across the provider runtime.
// Dependencies: serde, serde_json, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! The domain model is pure data: no I/O, no clocks, no persistence. The
//! runtime modules compose these types; the contract crate translates them to
//! and from the external wire shapes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod analytics;
pub mod builder;
pub mod game;
pub mod identifiers;
pub mod instance;
pub mod time;
