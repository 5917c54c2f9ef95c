//! Resolution property-based tests.
//!
//! ## Purpose
//! These tests fuzz activity identifiers to check the resolution invariants
//! hold for arbitrary platform input, not just the fixtures used elsewhere.
//!
//! ## What is covered
//! - Repeated resolution of the same identifier is idempotent.
//! - Distinct identifiers never share an instance identifier.
//! - Seed derivation is a pure function of the identifier.
//! - Blank identifiers always fail validation without panicking.
//!
//! ## What is intentionally out of scope
//! - Concurrency (covered by `resolution_unit.rs`).
//! - Store coherence (covered by `cache_unit.rs`).
// crates/lettergrid-core/tests/proptest_resolution.rs
// ============================================================================
// Module: Resolution Property-Based Tests
// Description: Fuzz-like checks for identifier parsing and resolution.
// Purpose: Ensure idempotence and injectivity hold for arbitrary input.
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

use lettergrid_core::ActivityId;
use lettergrid_core::GameConfigBuilder;
use lettergrid_core::InstanceRegistry;
use lettergrid_core::ParamOverrides;
use proptest::prelude::*;

/// Strategy producing identifiers that survive trimming.
fn activity_ids() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,32}"
}

proptest! {
    #[test]
    fn resolve_is_idempotent_for_any_id(raw in activity_ids()) {
        let registry = InstanceRegistry::new();
        let id = ActivityId::parse(&raw).unwrap();
        let first = registry.resolve(&id).unwrap();
        let second = registry.resolve(&id).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn distinct_ids_never_collide(a in activity_ids(), b in activity_ids()) {
        prop_assume!(a != b);
        let registry = InstanceRegistry::new();
        let first = registry.resolve(&ActivityId::parse(&a).unwrap()).unwrap();
        let second = registry.resolve(&ActivityId::parse(&b).unwrap()).unwrap();
        prop_assert_ne!(first, second);
    }

    #[test]
    fn builds_are_reproducible(raw in activity_ids()) {
        let id = ActivityId::parse(&raw).unwrap();
        let builder = GameConfigBuilder::new();
        let first = builder.build(&id, &ParamOverrides::new()).unwrap();
        let second = builder.build(&id, &ParamOverrides::new()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn blank_ids_fail_closed(raw in "[ \t]{0,8}") {
        prop_assert!(ActivityId::parse(&raw).is_err());
    }
}
