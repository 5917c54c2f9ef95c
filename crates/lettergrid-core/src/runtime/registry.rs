// crates/lettergrid-core/src/runtime/registry.rs
// ============================================================================
// Module: Instance Registry
// Description: Process-wide mapping from activity identifier to instance identifier.
// Purpose: Guarantee at most one instance per activity for the process lifetime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The registry owns the one process-wide mapping from [`ActivityId`] to
//! [`InstanceId`]. Resolution is idempotent: re-resolving an activity always
//! returns the same instance identifier, and the write path is serialized by
//! a single mutex so two concurrent first resolutions of the same activity
//! cannot record different identifiers. The mapping is injective in both
//! directions because the identifier derivation itself is injective.
//!
//! Identifier validity is enforced by [`ActivityId::parse`] at the boundary;
//! the registry has no error path of its own beyond lock poisoning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::core::identifiers::ActivityId;
use crate::core::identifiers::InstanceId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry mutex was poisoned by a panicking thread.
    #[error("instance registry mutex poisoned")]
    Poisoned,
}

// ============================================================================
// SECTION: Instance Registry
// ============================================================================

/// Process-wide activity-to-instance mapping.
///
/// # Invariants
/// - Injective both ways: one instance per activity, one activity per instance.
/// - Entries are created on first resolution and never destroyed.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    /// Resolved mappings, serialized by one mutex.
    entries: Mutex<BTreeMap<ActivityId, InstanceId>>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the instance identifier for an activity, creating the mapping
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Poisoned`] when the registry lock is poisoned.
    pub fn resolve(&self, activity_id: &ActivityId) -> Result<InstanceId, RegistryError> {
        let mut guard = self.entries.lock().map_err(|_| RegistryError::Poisoned)?;
        if let Some(existing) = guard.get(activity_id) {
            return Ok(existing.clone());
        }
        let instance_id = InstanceId::for_activity(activity_id);
        guard.insert(activity_id.clone(), instance_id.clone());
        Ok(instance_id)
    }

    /// Returns the instance identifier for an activity without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Poisoned`] when the registry lock is poisoned.
    pub fn lookup(&self, activity_id: &ActivityId) -> Result<Option<InstanceId>, RegistryError> {
        let guard = self.entries.lock().map_err(|_| RegistryError::Poisoned)?;
        Ok(guard.get(activity_id).cloned())
    }

    /// Returns the number of resolved activities.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Poisoned`] when the registry lock is poisoned.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let guard = self.entries.lock().map_err(|_| RegistryError::Poisoned)?;
        Ok(guard.len())
    }

    /// Returns true when no activity has been resolved yet.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Poisoned`] when the registry lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}
