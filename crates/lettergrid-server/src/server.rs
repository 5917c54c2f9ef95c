// crates/lettergrid-server/src/server.rs
// ============================================================================
// Module: HTTP Boundary
// Description: Axum routes implementing the platform contract.
// Purpose: Wire the facade and contract adapter into the HTTP surface.
// Dependencies: axum, lettergrid-contract, lettergrid-core, lettergrid-store-sqlite
// ============================================================================

//! ## Overview
//! Each contract endpoint is exposed under its canonical name and a
//! compatibility alias (`/user_url` and `/deploy`, `/analytics_url` and
//! `/analytics`, and so on). Handlers translate wire payloads through the
//! contract adapter, call one facade operation, and map errors to status
//! codes: contract violations and invalid parameters to 400, unresolved
//! analytics to 404, store failures to 500. The public base URL honors
//! `x-forwarded-proto`/`x-forwarded-host`/`x-forwarded-prefix` with the
//! configured fallback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use lettergrid_contract::AnalyticsListResponse;
use lettergrid_contract::AnalyticsRequest;
use lettergrid_contract::AnalyticsResponse;
use lettergrid_contract::ContractError;
use lettergrid_contract::DeployRequest;
use lettergrid_contract::ParamsResponse;
use lettergrid_contract::UserUrlResponse;
use lettergrid_contract::adapt_activity_id;
use lettergrid_contract::adapt_analytics_request;
use lettergrid_contract::adapt_deploy_request;
use lettergrid_contract::adapt_user_id;
use lettergrid_contract::analytics_response;
use lettergrid_contract::params_response;
use lettergrid_contract::user_url_response;
use lettergrid_core::ActivityProviderFacade;
use lettergrid_core::Clock;
use lettergrid_core::InMemoryInstanceStore;
use lettergrid_core::ProviderError;
use lettergrid_core::SharedInstanceStore;
use lettergrid_core::Timestamp;
use lettergrid_store_sqlite::SqliteInstanceStore;
use serde::Deserialize;
use serde_json::json;

use crate::audit::AuditSink;
use crate::audit::RequestAuditEvent;
use crate::config::ConfigError;
use crate::config::ProviderConfig;
use crate::config::StoreType;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Wall-clock time source for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        Timestamp::from_unix_millis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct ServerState {
    /// Provider facade owning registry, cache, and builder.
    pub facade: Arc<ActivityProviderFacade>,
    /// Request audit sink.
    pub audit: Arc<dyn AuditSink>,
    /// Base URL used when no forwarding headers are present.
    pub fallback_base_url: Option<String>,
}

/// Builds the server state from validated configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configured store backend cannot be
/// opened.
pub fn build_server_state(
    config: &ProviderConfig,
    audit: Arc<dyn AuditSink>,
) -> Result<ServerState, ConfigError> {
    let store = match config.store.store_type {
        StoreType::Memory => SharedInstanceStore::from_store(InMemoryInstanceStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config.store.sqlite_config()?;
            let store = SqliteInstanceStore::new(&sqlite_config)
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            SharedInstanceStore::from_store(store)
        }
    };
    Ok(ServerState {
        facade: Arc::new(ActivityProviderFacade::new(store, Arc::new(SystemClock))),
        audit,
        fallback_base_url: config.server.public_base_url.clone(),
    })
}

/// Builds the router exposing the contract routes and their aliases.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route("/config_url", get(handle_config))
        .route("/config", get(handle_config))
        .route("/json_params_url", get(handle_params))
        .route("/params", get(handle_params))
        .route("/user_url", get(handle_user_url))
        .route("/deploy", get(handle_user_url))
        .route("/analytics_list_url", get(handle_analytics_list))
        .route("/analytics/available", get(handle_analytics_list))
        .route("/analytics_url", post(handle_analytics))
        .route("/analytics", post(handle_analytics))
        .route("/game/{activityID}", get(handle_game))
        .with_state(state)
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Error response emitted by handlers.
struct ApiError {
    /// HTTP status for the failure.
    status: StatusCode,
    /// Stable error message.
    message: String,
}

impl ApiError {
    /// Returns the stable label recorded in audit events.
    fn label(&self) -> String {
        self.message.clone()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<ContractError> for ApiError {
    fn from(error: ContractError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: error.to_string(),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(error: ProviderError) -> Self {
        let status = match error {
            ProviderError::Identifier(_) | ProviderError::Build(_) => StatusCode::BAD_REQUEST,
            ProviderError::NotFound(_) => StatusCode::NOT_FOUND,
            ProviderError::Registry(_) | ProviderError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Base URL Resolution
// ============================================================================

/// Resolves the public base URL for link generation.
///
/// Forwarding headers win; the configured fallback applies when they are
/// absent; an empty base yields relative URLs.
fn public_base_url(headers: &HeaderMap, fallback: Option<&str>) -> String {
    let forwarded_host = header_value(headers, "x-forwarded-host");
    let host = forwarded_host.or_else(|| header_value(headers, "host"));
    let Some(host) = host else {
        return fallback.unwrap_or("").trim_end_matches('/').to_string();
    };
    let proto = header_value(headers, "x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let prefix = header_value(headers, "x-forwarded-prefix")
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_default();
    format!("{proto}://{host}{prefix}")
}

/// Reads one header as a trimmed non-empty string.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// ============================================================================
// SECTION: Audit Helper
// ============================================================================

/// Records one audit event for a handled request.
fn audit_request(
    state: &ServerState,
    method: &str,
    path: &str,
    status: StatusCode,
    activity_id: Option<&str>,
    error: Option<String>,
) {
    state.audit.record(&RequestAuditEvent {
        time_ms: SystemClock.now().unix_millis(),
        method: method.to_string(),
        path: path.to_string(),
        status: status.as_u16(),
        activity_id: activity_id.map(str::to_string),
        error,
    });
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Serves the landing page listing the contract endpoints.
async fn handle_home(State(state): State<ServerState>, headers: HeaderMap) -> Html<String> {
    let base = public_base_url(&headers, state.fallback_base_url.as_deref());
    audit_request(&state, "GET", "/", StatusCode::OK, None, None);
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Lettergrid Activity Provider</title></head>
<body>
  <h2>Lettergrid Activity Provider</h2>
  <ul>
    <li><a href="{base}/config">GET /config</a></li>
    <li><a href="{base}/params">GET /params</a></li>
    <li><a href="{base}/deploy?activityID=TESTE123">GET /deploy?activityID=TESTE123</a></li>
    <li><a href="{base}/analytics/available">GET /analytics/available</a></li>
  </ul>
</body>
</html>"#
    ))
}

/// Serves the instructor-facing configuration page.
async fn handle_config(State(state): State<ServerState>, headers: HeaderMap) -> Html<String> {
    let base = public_base_url(&headers, state.fallback_base_url.as_deref());
    let schema = state.facade.params_schema();
    audit_request(&state, "GET", "/config_url", StatusCode::OK, None, None);
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{activity} - Config</title></head>
<body>
  <h2>Configuration - {activity}</h2>
  <p>Configuration page for the orchestrating platform.</p>
  <p><strong>Shortcuts:</strong></p>
  <ul>
    <li><a href="{base}/params">GET /params</a></li>
    <li><a href="{base}/deploy?activityID=TESTE123">GET /deploy?activityID=TESTE123</a></li>
  </ul>
  <form>
    <label>Board size: <input name="size" type="number" value="10"/></label><br/>
    <label>Words (comma separated): <input name="words" value="APSI,INVENIRA,FACADE,ADAPTER,PROXY"/></label><br/>
    <button type="button">Save (example)</button>
  </form>
</body>
</html>"#,
        activity = schema.activity,
    ))
}

/// Returns the advertised parameter schema.
async fn handle_params(State(state): State<ServerState>) -> Json<ParamsResponse> {
    let response = params_response(state.facade.params_schema());
    audit_request(&state, "GET", "/json_params_url", StatusCode::OK, None, None);
    Json(response)
}

/// Resolves the entry URL for an activity, creating the instance on first use.
async fn handle_user_url(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(request): Query<DeployRequest>,
) -> Result<Json<UserUrlResponse>, Response> {
    let outcome = (|| {
        let (activity_id, user_id) = adapt_deploy_request(&request)?;
        let base = public_base_url(&headers, state.fallback_base_url.as_deref());
        let resolution = state
            .facade
            .resolve_entry_url(&activity_id, user_id.as_ref(), &base)
            .map_err(ApiError::from)?;
        Ok::<_, ApiError>(user_url_response(&resolution))
    })();
    match outcome {
        Ok(response) => {
            audit_request(
                &state,
                "GET",
                "/user_url",
                StatusCode::OK,
                Some(&response.activity_id),
                None,
            );
            Ok(Json(response))
        }
        Err(error) => {
            audit_request(
                &state,
                "GET",
                "/user_url",
                error.status,
                Some(&request.activity_id),
                Some(error.label()),
            );
            Err(error.into_response())
        }
    }
}

/// Lists the available analytics queries.
async fn handle_analytics_list(State(state): State<ServerState>) -> Json<AnalyticsListResponse> {
    let response = AnalyticsListResponse {
        available_queries: state.facade.list_analytics_kinds(),
    };
    audit_request(&state, "GET", "/analytics_list_url", StatusCode::OK, None, None);
    Json(response)
}

/// Answers one analytics query.
async fn handle_analytics(
    State(state): State<ServerState>,
    Json(request): Json<AnalyticsRequest>,
) -> Result<Json<AnalyticsResponse>, Response> {
    let outcome = (|| {
        let query = adapt_analytics_request(&request)?;
        let report = state.facade.query_analytics(&query).map_err(ApiError::from)?;
        Ok::<_, ApiError>(analytics_response(report))
    })();
    match outcome {
        Ok(response) => {
            audit_request(
                &state,
                "POST",
                "/analytics_url",
                StatusCode::OK,
                Some(&response.activity_id),
                None,
            );
            Ok(Json(response))
        }
        Err(error) => {
            audit_request(
                &state,
                "POST",
                "/analytics_url",
                error.status,
                Some(&request.activity_id),
                Some(error.label()),
            );
            Err(error.into_response())
        }
    }
}

/// Query parameters accepted by the game entry page.
#[derive(Debug, Clone, Default, Deserialize)]
struct GamePageQuery {
    /// Optional learner identifier.
    #[serde(rename = "userID", default)]
    user_id: Option<String>,
}

/// Serves the game entry page and records a `game_access` event.
async fn handle_game(
    State(state): State<ServerState>,
    Path(activity_id): Path<String>,
    Query(query): Query<GamePageQuery>,
) -> Result<Html<String>, Response> {
    let outcome = (|| {
        let activity_id = adapt_activity_id(&activity_id)?;
        let user_id = adapt_user_id(query.user_id.as_deref());
        let record = state
            .facade
            .track_access(&activity_id, user_id.as_ref())
            .map_err(ApiError::from)?;
        Ok::<_, ApiError>((activity_id, user_id, record))
    })();
    match outcome {
        Ok((resolved, user_id, record)) => {
            audit_request(
                &state,
                "GET",
                "/game",
                StatusCode::OK,
                Some(resolved.as_str()),
                None,
            );
            let learner = user_id.as_ref().map_or("-", |user| user.as_str());
            Ok(Html(format!(
                r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Word Search - {activity}</title></head>
<body>
  <h2>Word Search (Demo) - activityID={activity}</h2>
  <p>userID: {learner}</p>
  <p>Grid: {size}x{size}, {words} words. Opening this page records a
     'game_access' event for analytics.</p>
</body>
</html>"#,
                activity = resolved.as_str(),
                size = record.game.size,
                words = record.game.words.len(),
            )))
        }
        Err(error) => {
            audit_request(
                &state,
                "GET",
                "/game",
                error.status,
                Some(&activity_id),
                Some(error.label()),
            );
            Err(error.into_response())
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
