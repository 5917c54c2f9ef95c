// crates/lettergrid-contract/src/adapter.rs
// ============================================================================
// Module: Contract Adapter
// Description: Pure translation between wire payloads and core types.
// Purpose: Normalize and validate external input before the facade runs.
// Dependencies: lettergrid-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Stateless translation per use case. The `adapt_*` functions turn wire
//! payloads into validated core values, applying the contract's defaults
//! (empty `query` becomes `default`, absent `params` becomes an empty map)
//! and rejecting malformed input with [`ContractError`]. The `*_response`
//! functions map core results back into wire shapes; they never fail because
//! core values are valid by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use lettergrid_core::ActivityId;
use lettergrid_core::AnalyticsQuery;
use lettergrid_core::AnalyticsReport;
use lettergrid_core::DeployResolution;
use lettergrid_core::IdentifierError;
use lettergrid_core::ParamsSchema;
use lettergrid_core::QUERY_DEFAULT;
use lettergrid_core::UserId;
use thiserror::Error;

use crate::types::AnalyticsRequest;
use crate::types::AnalyticsResponse;
use crate::types::DeployRequest;
use crate::types::ParamsResponse;
use crate::types::UserUrlResponse;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when an external payload violates the contract.
///
/// # Invariants
/// - Raised before any facade invocation; a rejected payload has no side
///   effect on registry, cache, or store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A required field was missing or blank.
    #[error("contract violation: {field} is required")]
    MissingField {
        /// Contract field name as it appears on the wire.
        field: &'static str,
    },
}

impl From<IdentifierError> for ContractError {
    fn from(error: IdentifierError) -> Self {
        match error {
            IdentifierError::Empty => Self::MissingField {
                field: "activityID",
            },
        }
    }
}

// ============================================================================
// SECTION: Inbound Translation
// ============================================================================

/// Validates and normalizes a wire activity identifier.
///
/// # Errors
///
/// Returns [`ContractError::MissingField`] when the trimmed input is empty.
pub fn adapt_activity_id(raw: &str) -> Result<ActivityId, ContractError> {
    Ok(ActivityId::parse(raw)?)
}

/// Normalizes an optional wire learner identifier; blank becomes absent.
#[must_use]
pub fn adapt_user_id(raw: Option<&str>) -> Option<UserId> {
    raw.and_then(UserId::parse)
}

/// Translates an entry-URL resolution request into core identifiers.
///
/// # Errors
///
/// Returns [`ContractError`] when the activity identifier is missing.
pub fn adapt_deploy_request(
    request: &DeployRequest,
) -> Result<(ActivityId, Option<UserId>), ContractError> {
    let activity_id = adapt_activity_id(&request.activity_id)?;
    let user_id = adapt_user_id(request.user_id.as_deref());
    Ok((activity_id, user_id))
}

/// Translates an analytics request, applying the contract defaults.
///
/// # Errors
///
/// Returns [`ContractError`] when the activity identifier is missing.
pub fn adapt_analytics_request(request: &AnalyticsRequest) -> Result<AnalyticsQuery, ContractError> {
    let activity_id = adapt_activity_id(&request.activity_id)?;
    let user_id = adapt_user_id(request.user_id.as_deref());
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(QUERY_DEFAULT)
        .to_string();
    Ok(AnalyticsQuery {
        activity_id,
        user_id,
        query,
        params: request.params.clone().unwrap_or_default(),
    })
}

// ============================================================================
// SECTION: Outbound Translation
// ============================================================================

/// Maps a resolved deployment into the wire response.
#[must_use]
pub fn user_url_response(resolution: &DeployResolution) -> UserUrlResponse {
    UserUrlResponse {
        activity_id: resolution.activity_id.as_str().to_string(),
        entry_url: resolution.entry_url.clone(),
        instance_id: resolution.instance_id.as_str().to_string(),
    }
}

/// Wraps the advertised parameter schema in the wire response.
#[must_use]
pub fn params_response(schema: ParamsSchema) -> ParamsResponse {
    ParamsResponse {
        schema,
    }
}

/// Maps a derived analytics report into the wire response.
#[must_use]
pub fn analytics_response(report: AnalyticsReport) -> AnalyticsResponse {
    AnalyticsResponse {
        activity_id: report.activity_id.as_str().to_string(),
        query: report.query,
        result: report.values,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
