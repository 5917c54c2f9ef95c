// crates/lettergrid-core/src/interfaces/mod.rs
// ============================================================================
// Module: Lettergrid Interfaces
// Description: Backend-agnostic interfaces for persistence and time.
// Purpose: Define the contract surfaces used by the provider runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the provider integrates with its collaborators
//! without embedding backend details. The store contract is key-value with an
//! append-only event log; durability and on-disk layout belong entirely to
//! the implementation. Store failures propagate as typed errors and are
//! never retried here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::core::identifiers::ActivityId;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::UserId;
use crate::core::instance::ActivityEvent;
use crate::core::instance::InstanceRecord;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Instance store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("instance store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("instance store corruption: {0}")]
    Corrupt(String),
    /// Store data is invalid.
    #[error("instance store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("instance store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Instance Store
// ============================================================================

/// Filter applied when listing activity events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Restrict to one activity, when set.
    pub activity_id: Option<ActivityId>,
    /// Restrict to one learner, when set.
    pub user_id: Option<UserId>,
}

impl EventFilter {
    /// Returns a filter scoped to one activity.
    #[must_use]
    pub const fn for_activity(activity_id: ActivityId) -> Self {
        Self {
            activity_id: Some(activity_id),
            user_id: None,
        }
    }

    /// Narrows the filter to one learner.
    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Returns true when the event passes the filter.
    #[must_use]
    pub fn matches(&self, event: &ActivityEvent) -> bool {
        if let Some(activity_id) = &self.activity_id
            && &event.activity_id != activity_id
        {
            return false;
        }
        if let Some(user_id) = &self.user_id
            && event.user_id.as_ref() != Some(user_id)
        {
            return false;
        }
        true
    }
}

/// Durable key-value store for instance records and activity events.
///
/// Implementations own durability and on-disk layout; callers tolerate
/// blocking I/O and receive failures as [`StoreError`] without retries.
pub trait InstanceStore {
    /// Loads the record for an instance, when present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn get_instance(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, StoreError>;

    /// Writes or overwrites the record for an instance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write does not reach durable state.
    fn put_instance(&self, record: &InstanceRecord) -> Result<(), StoreError>;

    /// Returns true when a record exists for the instance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn instance_exists(&self, instance_id: &InstanceId) -> Result<bool, StoreError> {
        Ok(self.get_instance(instance_id)?.is_some())
    }

    /// Appends one event to the activity log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the append does not reach durable state.
    fn append_event(&self, event: &ActivityEvent) -> Result<(), StoreError>;

    /// Lists events matching the filter, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError>;
}

/// Shared handle over an instance store implementation.
#[derive(Clone)]
pub struct SharedInstanceStore {
    /// Store implementation behind a shared pointer.
    inner: Arc<dyn InstanceStore + Send + Sync>,
}

impl SharedInstanceStore {
    /// Wraps a store implementation in a shared handle.
    pub fn from_store(store: impl InstanceStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl InstanceStore for SharedInstanceStore {
    fn get_instance(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, StoreError> {
        self.inner.get_instance(instance_id)
    }

    fn put_instance(&self, record: &InstanceRecord) -> Result<(), StoreError> {
        self.inner.put_instance(record)
    }

    fn instance_exists(&self, instance_id: &InstanceId) -> Result<bool, StoreError> {
        self.inner.instance_exists(instance_id)
    }

    fn append_event(&self, event: &ActivityEvent) -> Result<(), StoreError> {
        self.inner.append_event(event)
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError> {
        self.inner.list_events(filter)
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory instance store for tests and the server's memory mode.
#[derive(Debug, Default, Clone)]
pub struct InMemoryInstanceStore {
    /// Instance records keyed by instance identifier.
    instances: Arc<Mutex<BTreeMap<String, InstanceRecord>>>,
    /// Append-only event log.
    events: Arc<Mutex<Vec<ActivityEvent>>>,
}

impl InMemoryInstanceStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceStore for InMemoryInstanceStore {
    fn get_instance(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, StoreError> {
        let guard = self
            .instances
            .lock()
            .map_err(|_| StoreError::Store("instance store mutex poisoned".to_string()))?;
        Ok(guard.get(instance_id.as_str()).cloned())
    }

    fn put_instance(&self, record: &InstanceRecord) -> Result<(), StoreError> {
        self.instances
            .lock()
            .map_err(|_| StoreError::Store("instance store mutex poisoned".to_string()))?
            .insert(record.instance_id.as_str().to_string(), record.clone());
        Ok(())
    }

    fn append_event(&self, event: &ActivityEvent) -> Result<(), StoreError> {
        self.events
            .lock()
            .map_err(|_| StoreError::Store("event log mutex poisoned".to_string()))?
            .push(event.clone());
        Ok(())
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError> {
        let guard = self
            .events
            .lock()
            .map_err(|_| StoreError::Store("event log mutex poisoned".to_string()))?;
        Ok(guard.iter().filter(|event| filter.matches(event)).cloned().collect())
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Time source injected into the facade.
///
/// The core never reads wall-clock time directly; hosts supply an
/// implementation (the server crate provides a system clock).
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Fixed clock for deterministic tests and examples.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant this clock always reports.
    at: Timestamp,
}

impl FixedClock {
    /// Creates a clock pinned to the given instant.
    #[must_use]
    pub const fn at(at: Timestamp) -> Self {
        Self {
            at,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at
    }
}
