// crates/lettergrid-contract/src/types.rs
// ============================================================================
// Module: Contract Wire Types
// Description: Request and response payloads for the platform contract.
// Purpose: Provide canonical serde shapes with contract field names.
// Dependencies: lettergrid-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The platform speaks `activityID`/`userID`; these shapes carry that naming
//! on the wire while exposing snake_case fields internally. Requests are
//! deserialized leniently (optional fields default) and then normalized by
//! the adapter; responses are assembled only from already-validated core
//! values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use lettergrid_core::AnalyticsKind;
use lettergrid_core::ParamsSchema;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Query parameters accepted by the entry-URL resolution endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployRequest {
    /// Activity identifier supplied by the platform.
    #[serde(rename = "activityID")]
    pub activity_id: String,
    /// Optional learner identifier.
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
}

/// Request body for aggregated analytics queries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsRequest {
    /// Activity identifier supplied by the platform.
    #[serde(rename = "activityID")]
    pub activity_id: String,
    /// Optional learner identifier.
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    /// Optional query name; empty normalizes to `default`.
    #[serde(default)]
    pub query: Option<String>,
    /// Optional query parameters; absent normalizes to empty.
    #[serde(default)]
    pub params: Option<BTreeMap<String, Value>>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response for entry-URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUrlResponse {
    /// Activity the resolution covers.
    #[serde(rename = "activityID")]
    pub activity_id: String,
    /// Entry URL handed to the platform.
    pub entry_url: String,
    /// Instance backing the activity.
    pub instance_id: String,
}

/// Response carrying the advertised parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamsResponse {
    /// Parameter schema for the activity.
    pub schema: ParamsSchema,
}

/// Response listing the available analytics queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsListResponse {
    /// Advertised analytics queries, in stable order.
    pub available_queries: Vec<AnalyticsKind>,
}

/// Response for one analytics query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsResponse {
    /// Activity the report covers.
    #[serde(rename = "activityID")]
    pub activity_id: String,
    /// Query name the report answers.
    pub query: String,
    /// Derived values keyed by metric name.
    pub result: BTreeMap<String, Value>,
}
