// crates/lettergrid-core/src/core/analytics.rs
// ============================================================================
// Module: Analytics Model
// Description: Advertised analytics kinds, query shape, and derived reports.
// Purpose: Describe the thin analytics surface exposed by the provider.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Analytics in this provider are a thin read over the cached instance record
//! and the event log; there is no aggregation engine. The advertised kinds
//! are a static enumeration, and a report is a flat mapping assembled by the
//! facade according to the requested query name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ActivityId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Query Names
// ============================================================================

/// Query name resolving to the access summary.
pub const QUERY_DEFAULT: &str = "default";
/// Query name for the per-activity access counter.
pub const QUERY_ACCESS_COUNT: &str = "access_count";
/// Query name for the per-activity event count.
pub const QUERY_EVENTS_COUNT: &str = "events_count";
/// Query name for the per-learner event count.
pub const QUERY_USER_EVENTS_COUNT: &str = "user_events_count";

// ============================================================================
// SECTION: Analytics Kinds
// ============================================================================

/// One advertised analytics query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsKind {
    /// Stable query identifier.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// How the query is invoked.
    pub method: String,
    /// Required request parameters.
    pub params: Vec<String>,
}

/// Returns the static enumeration of available analytics queries.
#[must_use]
pub fn available_analytics() -> Vec<AnalyticsKind> {
    vec![
        AnalyticsKind {
            id: QUERY_ACCESS_COUNT.to_string(),
            label: "Total accesses per activity".to_string(),
            method: "POST analytics".to_string(),
            params: vec!["activityID".to_string()],
        },
        AnalyticsKind {
            id: QUERY_EVENTS_COUNT.to_string(),
            label: "Total events per activity".to_string(),
            method: "POST analytics".to_string(),
            params: vec!["activityID".to_string()],
        },
        AnalyticsKind {
            id: QUERY_USER_EVENTS_COUNT.to_string(),
            label: "Events per learner".to_string(),
            method: "POST analytics".to_string(),
            params: vec!["activityID".to_string(), "userID".to_string()],
        },
    ]
}

// ============================================================================
// SECTION: Query and Report
// ============================================================================

/// Normalized analytics query produced by the contract adapter.
///
/// # Invariants
/// - `query` is never empty; the adapter defaults it to [`QUERY_DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsQuery {
    /// Activity the query targets.
    pub activity_id: ActivityId,
    /// Learner scope, when the query is per-learner.
    pub user_id: Option<UserId>,
    /// Query name.
    pub query: String,
    /// Additional query parameters, uninterpreted by the core.
    pub params: BTreeMap<String, Value>,
}

/// Derived analytics report returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Activity the report covers.
    pub activity_id: ActivityId,
    /// Query name the report answers.
    pub query: String,
    /// Derived values keyed by metric name.
    pub values: BTreeMap<String, Value>,
}
