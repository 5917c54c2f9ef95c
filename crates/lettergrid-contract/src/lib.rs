// crates/lettergrid-contract/src/lib.rs
// ============================================================================
// Module: Lettergrid Contract Library
// Description: Platform wire shapes and the translation adapter.
// Purpose: Isolate the external contract from the internal domain model.
// Dependencies: lettergrid-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate owns the shapes that cross the wire between the orchestrating
//! platform and the provider, and the pure functions translating them into
//! core types. Field names follow the platform contract (`activityID`,
//! `userID`) even where they break Rust naming conventions; serde renames
//! keep the internal fields idiomatic. Malformed payloads are rejected here,
//! before the facade is invoked.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod adapter;
mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::ContractError;
pub use adapter::adapt_activity_id;
pub use adapter::adapt_analytics_request;
pub use adapter::adapt_deploy_request;
pub use adapter::adapt_user_id;
pub use adapter::analytics_response;
pub use adapter::params_response;
pub use adapter::user_url_response;
pub use types::AnalyticsListResponse;
pub use types::AnalyticsRequest;
pub use types::AnalyticsResponse;
pub use types::DeployRequest;
pub use types::ParamsResponse;
pub use types::UserUrlResponse;
