// crates/lettergrid-server/src/server/tests.rs
// ============================================================================
// Module: HTTP Boundary Unit Tests
// Description: Handler-level tests with in-memory fixtures.
// Purpose: Validate base URL resolution, contract routes, and error mapping.
// Dependencies: lettergrid-server
// ============================================================================

//! ## Overview
//! Exercises the handlers directly against an in-memory store: entry-URL
//! resolution with forwarded headers, analytics status mapping, contract
//! rejection of blank identifiers, and access tracking through the game
//! page.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use lettergrid_contract::AnalyticsRequest;
use lettergrid_contract::DeployRequest;
use lettergrid_core::ActivityProviderFacade;
use lettergrid_core::InMemoryInstanceStore;
use lettergrid_core::SharedInstanceStore;
use serde_json::json;

use super::GamePageQuery;
use super::ServerState;
use super::SystemClock;
use super::handle_analytics;
use super::handle_game;
use super::handle_params;
use super::handle_user_url;
use super::public_base_url;
use crate::audit::NoopAuditSink;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_state() -> ServerState {
    let store = SharedInstanceStore::from_store(InMemoryInstanceStore::new());
    ServerState {
        facade: Arc::new(ActivityProviderFacade::new(store, Arc::new(SystemClock))),
        audit: Arc::new(NoopAuditSink),
        fallback_base_url: Some("https://fallback.example.org".to_string()),
    }
}

fn forwarded_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
    headers.insert("x-forwarded-host", HeaderValue::from_static("ap.example.org"));
    headers.insert("x-forwarded-prefix", HeaderValue::from_static("/provider/"));
    headers
}

fn analytics_request(activity: &str, query: Option<&str>) -> AnalyticsRequest {
    AnalyticsRequest {
        activity_id: activity.to_string(),
        user_id: None,
        query: query.map(str::to_string),
        params: None,
    }
}

// ============================================================================
// SECTION: Base URL Tests
// ============================================================================

#[test]
fn forwarding_headers_win_over_the_fallback() {
    let base = public_base_url(&forwarded_headers(), Some("https://fallback.example.org"));
    assert_eq!(base, "https://ap.example.org/provider");
}

#[test]
fn host_header_applies_without_forwarding() {
    let mut headers = HeaderMap::new();
    headers.insert("host", HeaderValue::from_static("localhost:8000"));
    assert_eq!(public_base_url(&headers, None), "http://localhost:8000");
}

#[test]
fn fallback_applies_without_any_host() {
    let headers = HeaderMap::new();
    let base = public_base_url(&headers, Some("https://fallback.example.org/"));
    assert_eq!(base, "https://fallback.example.org");
    assert_eq!(public_base_url(&headers, None), "");
}

// ============================================================================
// SECTION: Handler Tests
// ============================================================================

#[tokio::test]
async fn params_exposes_the_schema() {
    let state = sample_state();
    let response = handle_params(State(state)).await;
    let names: Vec<_> =
        response.0.schema.params.iter().map(|param| param.name.clone()).collect();
    assert_eq!(names, vec!["size", "words"]);
}

#[tokio::test]
async fn deploy_resolves_the_entry_url() {
    let state = sample_state();
    let request = DeployRequest {
        activity_id: "TESTE123".to_string(),
        user_id: Some("1001".to_string()),
    };
    let response = handle_user_url(State(state), forwarded_headers(), Query(request))
        .await
        .expect("resolved");
    assert_eq!(response.0.activity_id, "TESTE123");
    assert_eq!(response.0.instance_id, "inst-TESTE123");
    assert_eq!(
        response.0.entry_url,
        "https://ap.example.org/provider/game/TESTE123?userID=1001"
    );
}

#[tokio::test]
async fn deploy_rejects_a_blank_activity() {
    let state = sample_state();
    let request = DeployRequest {
        activity_id: "   ".to_string(),
        user_id: None,
    };
    let response = handle_user_url(State(state), HeaderMap::new(), Query(request))
        .await
        .expect_err("must fail");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_for_an_unresolved_activity_is_not_found() {
    let state = sample_state();
    let request = analytics_request("NEVER_RESOLVED", None);
    let response = handle_analytics(State(state), axum::Json(request))
        .await
        .expect_err("must fail");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn game_page_records_an_access() {
    let state = sample_state();
    let page = handle_game(
        State(state.clone()),
        Path("TESTE123".to_string()),
        Query(GamePageQuery {
            user_id: Some("1001".to_string()),
        }),
    )
    .await
    .expect("page");
    assert!(page.0.contains("TESTE123"));

    let request = analytics_request("TESTE123", Some("access_count"));
    let response = handle_analytics(State(state), axum::Json(request)).await.expect("report");
    assert_eq!(response.0.result.get("access_count"), Some(&json!(1)));
}

#[tokio::test]
async fn game_page_rejects_a_blank_activity() {
    let state = sample_state();
    let response = handle_game(
        State(state),
        Path("   ".to_string()),
        Query(GamePageQuery::default()),
    )
    .await
    .expect_err("must fail");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
