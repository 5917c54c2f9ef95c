// crates/lettergrid-core/src/lib.rs
// ============================================================================
// Module: Lettergrid Core Library
// Description: Domain model and instance resolution runtime for the activity provider.
// Purpose: Provide identifiers, game configuration, storage interfaces, and the facade.
// Dependencies: serde, serde_json, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! `lettergrid-core` holds everything the activity provider needs behind its
//! external contract: strongly typed identifiers, the word-search game
//! configuration model, the storage interface, and the resolution runtime
//! (registry, caching proxy, facade). The HTTP boundary and the durable
//! store backends live in sibling crates and depend on this one.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::analytics::AnalyticsKind;
pub use core::analytics::AnalyticsQuery;
pub use core::analytics::AnalyticsReport;
pub use core::analytics::QUERY_ACCESS_COUNT;
pub use core::analytics::QUERY_DEFAULT;
pub use core::analytics::QUERY_EVENTS_COUNT;
pub use core::analytics::QUERY_USER_EVENTS_COUNT;
pub use core::analytics::available_analytics;
pub use core::builder::BuildError;
pub use core::builder::GameConfigBuilder;
pub use core::game::GameConfig;
pub use core::game::ParamOverrides;
pub use core::game::ParamSpec;
pub use core::game::ParamsSchema;
pub use core::game::params_schema;
pub use core::identifiers::ActivityId;
pub use core::identifiers::IdentifierError;
pub use core::identifiers::InstanceId;
pub use core::identifiers::UserId;
pub use core::instance::ActivityEvent;
pub use core::instance::EventKind;
pub use core::instance::InstanceRecord;
pub use core::time::Timestamp;
pub use interfaces::Clock;
pub use interfaces::EventFilter;
pub use interfaces::FixedClock;
pub use interfaces::InMemoryInstanceStore;
pub use interfaces::InstanceStore;
pub use interfaces::SharedInstanceStore;
pub use interfaces::StoreError;
pub use runtime::cache::CacheError;
pub use runtime::cache::ConfigCache;
pub use runtime::facade::ActivityProviderFacade;
pub use runtime::facade::DeployResolution;
pub use runtime::facade::ProviderError;
pub use runtime::registry::InstanceRegistry;
pub use runtime::registry::RegistryError;
