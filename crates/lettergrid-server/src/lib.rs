// crates/lettergrid-server/src/lib.rs
// ============================================================================
// Module: Lettergrid Server Library
// Description: HTTP boundary, configuration, and audit sink for the provider.
// Purpose: Expose the platform contract over axum with fail-closed config.
// Dependencies: axum, lettergrid-contract, lettergrid-core, lettergrid-store-sqlite
// ============================================================================

//! ## Overview
//! The server crate is the outermost layer: it loads and validates the TOML
//! configuration, builds the store backend, wires the facade into axum
//! handlers, and audits requests as JSON lines on stderr. Everything below
//! the handlers lives in the core, contract, and store crates; nothing in
//! this crate touches domain rules directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::StderrAuditSink;
pub use config::ConfigError;
pub use config::ProviderConfig;
pub use config::ServerConfig;
pub use config::StoreConfig;
pub use config::StoreType;
pub use server::ServerState;
pub use server::SystemClock;
pub use server::build_router;
pub use server::build_server_state;
