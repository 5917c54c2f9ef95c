// crates/lettergrid-core/src/runtime/mod.rs
// ============================================================================
// Module: Lettergrid Runtime
// Description: Instance resolution runtime composed by the facade.
// Purpose: Group the registry, caching proxy, and facade components.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime owns the invariants this provider exists to protect:
//! idempotent activity-to-instance resolution, read-after-write consistency,
//! and cache/store coherence. Everything here is explicit owned state
//! injected at service start; there are no hidden globals.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cache;
pub mod facade;
pub mod registry;
