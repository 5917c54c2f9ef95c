// crates/lettergrid-core/src/runtime/facade.rs
// ============================================================================
// Module: Activity Provider Facade
// Description: Use-case entry points composing registry, builder, and cache.
// Purpose: Implement the external contract's use cases as short compositions.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The facade is the single entry point the boundary layer calls. Each
//! operation is a short composition: registry resolution, configuration
//! build on first use, and cache-mediated persistence. Per activity the
//! state machine is `Unresolved -> Resolved` on the first configuration or
//! entry-URL resolution, terminal for the process lifetime.
//!
//! Override validation runs before any registry or cache mutation, so a
//! rejected build leaves no resolution side effect behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::core::analytics::AnalyticsKind;
use crate::core::analytics::AnalyticsQuery;
use crate::core::analytics::AnalyticsReport;
use crate::core::analytics::QUERY_ACCESS_COUNT;
use crate::core::analytics::QUERY_DEFAULT;
use crate::core::analytics::QUERY_EVENTS_COUNT;
use crate::core::analytics::QUERY_USER_EVENTS_COUNT;
use crate::core::analytics::available_analytics;
use crate::core::builder::BuildError;
use crate::core::builder::GameConfigBuilder;
use crate::core::game::ParamOverrides;
use crate::core::game::ParamsSchema;
use crate::core::game::params_schema;
use crate::core::identifiers::ActivityId;
use crate::core::identifiers::IdentifierError;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::UserId;
use crate::core::instance::ActivityEvent;
use crate::core::instance::EventKind;
use crate::core::instance::InstanceRecord;
use crate::interfaces::Clock;
use crate::interfaces::EventFilter;
use crate::interfaces::SharedInstanceStore;
use crate::runtime::cache::CacheError;
use crate::runtime::cache::ConfigCache;
use crate::runtime::registry::InstanceRegistry;
use crate::runtime::registry::RegistryError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by facade use cases.
///
/// # Invariants
/// - Variants are stable for programmatic handling; the boundary maps them to
///   status codes without string matching.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The external activity identifier was empty or malformed.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    /// Parameter overrides failed validation; nothing was built.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The activity was never resolved in this process.
    #[error("activity has no resolved instance: {0}")]
    NotFound(ActivityId),
    /// The registry lock was poisoned.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The cache or underlying store failed.
    #[error(transparent)]
    Store(#[from] CacheError),
}

// ============================================================================
// SECTION: Deploy Resolution
// ============================================================================

/// Result of resolving the entry URL for an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResolution {
    /// Activity the resolution covers.
    pub activity_id: ActivityId,
    /// Instance backing the activity.
    pub instance_id: InstanceId,
    /// Entry URL handed to the platform.
    pub entry_url: String,
}

// ============================================================================
// SECTION: Facade
// ============================================================================

/// Single entry point for the provider's use cases.
///
/// Owns the registry, builder, and caching proxy; created at service start
/// and injected into the boundary layer.
pub struct ActivityProviderFacade {
    /// Process-wide activity-to-instance registry.
    registry: InstanceRegistry,
    /// Write-through cache mediating all persistence.
    cache: ConfigCache,
    /// Deterministic configuration builder.
    builder: GameConfigBuilder,
    /// Host-supplied time source.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl ActivityProviderFacade {
    /// Creates a facade over the given store and clock.
    #[must_use]
    pub fn new(store: SharedInstanceStore, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            registry: InstanceRegistry::new(),
            cache: ConfigCache::new(store),
            builder: GameConfigBuilder::new(),
            clock,
        }
    }

    /// Resolves the configuration for an activity, building and persisting it
    /// on first use. Idempotent get-or-create.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Build`] for invalid overrides (with no
    /// registry or cache side effect) and [`ProviderError::Store`] when
    /// persistence fails.
    pub fn resolve_config(
        &self,
        activity_id: &ActivityId,
        overrides: &ParamOverrides,
    ) -> Result<InstanceRecord, ProviderError> {
        // Validation first: a rejected build must not resolve the activity.
        self.builder.validate(overrides)?;
        let instance_id = self.registry.resolve(activity_id)?;
        self.cache.get_or_create(&instance_id, || {
            let game = self.builder.build(activity_id, overrides)?;
            Ok(InstanceRecord::new(
                instance_id.clone(),
                activity_id.clone(),
                self.clock.now(),
                game,
            ))
        })
    }

    /// Resolves the entry URL for an activity, creating the instance on first
    /// use. The URL is derived deterministically from the activity identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] under the same conditions as
    /// [`Self::resolve_config`].
    pub fn resolve_entry_url(
        &self,
        activity_id: &ActivityId,
        user_id: Option<&UserId>,
        base_url: &str,
    ) -> Result<DeployResolution, ProviderError> {
        let record = self.resolve_config(activity_id, &ParamOverrides::new())?;
        let base = base_url.trim_end_matches('/');
        let mut entry_url = format!("{base}/game/{activity_id}");
        if let Some(user) = user_id {
            entry_url.push_str("?userID=");
            entry_url.push_str(user.as_str());
        }
        Ok(DeployResolution {
            activity_id: activity_id.clone(),
            instance_id: record.instance_id,
            entry_url,
        })
    }

    /// Returns the static enumeration of available analytics queries.
    #[must_use]
    pub fn list_analytics_kinds(&self) -> Vec<AnalyticsKind> {
        available_analytics()
    }

    /// Returns the parameter schema advertised to the platform.
    #[must_use]
    pub fn params_schema(&self) -> ParamsSchema {
        params_schema()
    }

    /// Answers an analytics query for a previously resolved activity.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the activity was never
    /// resolved in this process.
    pub fn query_analytics(&self, query: &AnalyticsQuery) -> Result<AnalyticsReport, ProviderError> {
        let instance_id = self
            .registry
            .lookup(&query.activity_id)?
            .ok_or_else(|| ProviderError::NotFound(query.activity_id.clone()))?;
        let record = self
            .cache
            .get(&instance_id)?
            .ok_or_else(|| ProviderError::NotFound(query.activity_id.clone()))?;

        let mut values = BTreeMap::new();
        let name = query.query.as_str();
        if matches!(name, QUERY_DEFAULT | QUERY_ACCESS_COUNT) {
            values.insert(QUERY_ACCESS_COUNT.to_string(), json!(record.access_count));
            values.insert("created_at".to_string(), json!(record.created_at.to_rfc3339()));
        }
        if matches!(name, QUERY_DEFAULT | QUERY_EVENTS_COUNT) {
            let filter = EventFilter::for_activity(query.activity_id.clone());
            let events = self.cache.list_events(&filter)?;
            values.insert(QUERY_EVENTS_COUNT.to_string(), json!(events.len()));
        }
        if name == QUERY_USER_EVENTS_COUNT {
            let mut filter = EventFilter::for_activity(query.activity_id.clone());
            if let Some(user) = &query.user_id {
                filter = filter.with_user(user.clone());
                values.insert("userID".to_string(), json!(user.as_str()));
            }
            let events = self.cache.list_events(&filter)?;
            values.insert(QUERY_USER_EVENTS_COUNT.to_string(), json!(events.len()));
        }
        Ok(AnalyticsReport {
            activity_id: query.activity_id.clone(),
            query: query.query.clone(),
            values,
        })
    }

    /// Records one game access: bumps the counters and appends a
    /// `game_access` event, creating the instance on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Store`] when persistence fails; the cache is
    /// never updated ahead of durable state.
    pub fn track_access(
        &self,
        activity_id: &ActivityId,
        user_id: Option<&UserId>,
    ) -> Result<InstanceRecord, ProviderError> {
        let mut record = self.resolve_config(activity_id, &ParamOverrides::new())?;
        record.record_access(self.clock.now());
        self.cache.put(&record)?;
        self.cache.append_event(&ActivityEvent {
            time: self.clock.now(),
            kind: EventKind::GameAccess,
            activity_id: activity_id.clone(),
            user_id: user_id.cloned(),
        })?;
        Ok(record)
    }
}
