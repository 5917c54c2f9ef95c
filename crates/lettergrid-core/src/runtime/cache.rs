// crates/lettergrid-core/src/runtime/cache.rs
// ============================================================================
// Module: Config Cache
// Description: Write-through caching proxy in front of the instance store.
// Purpose: Mediate every persistence access with lazy, per-key serialized loads.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ConfigCache`] is the only component that touches the persistent store;
//! swapping the storage backend changes nothing outside this file. Reads are
//! served from the in-memory map when possible and lazily populated from the
//! store on miss. Writes go to the store first and update the cache only
//! after the store write succeeds, so a store failure can never leave the
//! cache ahead of durable state. Population and creation are serialized per
//! instance identifier through lazily created per-key locks; the cache grows
//! unbounded for the process lifetime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::core::identifiers::InstanceId;
use crate::core::instance::ActivityEvent;
use crate::core::instance::InstanceRecord;
use crate::interfaces::EventFilter;
use crate::interfaces::InstanceStore;
use crate::interfaces::SharedInstanceStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Caching proxy errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A cache mutex was poisoned by a panicking thread.
    #[error("config cache mutex poisoned")]
    Poisoned,
}

// ============================================================================
// SECTION: Config Cache
// ============================================================================

/// Write-through cache over the instance store.
///
/// # Invariants
/// - Cache entries match or are newer than durable state (store-authoritative
///   writes; a failed put leaves the cache untouched).
/// - At most one load or creation is in flight per instance identifier.
pub struct ConfigCache {
    /// The durable store every access is mediated through.
    store: SharedInstanceStore,
    /// Loaded records keyed by instance identifier.
    entries: Mutex<BTreeMap<InstanceId, InstanceRecord>>,
    /// Lazily created per-key locks serializing load and creation.
    key_locks: Mutex<BTreeMap<InstanceId, Arc<Mutex<()>>>>,
}

impl ConfigCache {
    /// Creates an empty cache over the given store.
    #[must_use]
    pub fn new(store: SharedInstanceStore) -> Self {
        Self {
            store,
            entries: Mutex::new(BTreeMap::new()),
            key_locks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the record for an instance, loading from the store on miss.
    ///
    /// A miss in both cache and store is `Ok(None)`; the caller decides
    /// whether that means "build a new configuration".
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the store read fails or a lock is poisoned.
    pub fn get(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, CacheError> {
        if let Some(hit) = self.cached(instance_id)? {
            return Ok(Some(hit));
        }
        let key_lock = self.key_lock(instance_id)?;
        let _serialized = key_lock.lock().map_err(|_| CacheError::Poisoned)?;
        // Another caller may have populated the entry while we waited.
        if let Some(hit) = self.cached(instance_id)? {
            return Ok(Some(hit));
        }
        match self.store.get_instance(instance_id)? {
            Some(record) => {
                self.insert(record.clone())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Writes a record through to the store, then updates the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the store write fails; the cache is left
    /// untouched in that case.
    pub fn put(&self, record: &InstanceRecord) -> Result<(), CacheError> {
        let key_lock = self.key_lock(&record.instance_id)?;
        let _serialized = key_lock.lock().map_err(|_| CacheError::Poisoned)?;
        self.store.put_instance(record)?;
        self.insert(record.clone())
    }

    /// Returns the record for an instance, creating and persisting it when
    /// absent from both cache and store.
    ///
    /// `init` runs at most once per instance identifier across concurrent
    /// callers; the per-key lock is held for the whole load-or-create.
    ///
    /// # Errors
    ///
    /// Propagates `init` failures and [`CacheError`] conditions; a failed
    /// store write leaves neither a cache entry nor a durable record behind.
    pub fn get_or_create<E, F>(&self, instance_id: &InstanceId, init: F) -> Result<InstanceRecord, E>
    where
        E: From<CacheError>,
        F: FnOnce() -> Result<InstanceRecord, E>,
    {
        if let Some(hit) = self.cached(instance_id).map_err(E::from)? {
            return Ok(hit);
        }
        let key_lock = self.key_lock(instance_id).map_err(E::from)?;
        let _serialized = key_lock.lock().map_err(|_| E::from(CacheError::Poisoned))?;
        if let Some(hit) = self.cached(instance_id).map_err(E::from)? {
            return Ok(hit);
        }
        if let Some(record) =
            self.store.get_instance(instance_id).map_err(|err| E::from(CacheError::Store(err)))?
        {
            self.insert(record.clone()).map_err(E::from)?;
            return Ok(record);
        }
        let record = init()?;
        self.store
            .put_instance(&record)
            .map_err(|err| E::from(CacheError::Store(err)))?;
        self.insert(record.clone()).map_err(E::from)?;
        Ok(record)
    }

    /// Appends an event to the durable log.
    ///
    /// Events are not cached; the proxy still mediates the access so no other
    /// component reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the append fails.
    pub fn append_event(&self, event: &ActivityEvent) -> Result<(), CacheError> {
        Ok(self.store.append_event(event)?)
    }

    /// Lists events matching the filter from the durable log.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the store read fails.
    pub fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, CacheError> {
        Ok(self.store.list_events(filter)?)
    }

    /// Returns the cached record for an instance without touching the store.
    fn cached(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, CacheError> {
        let guard = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(guard.get(instance_id).cloned())
    }

    /// Inserts or replaces a cache entry.
    fn insert(&self, record: InstanceRecord) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .insert(record.instance_id.clone(), record);
        Ok(())
    }

    /// Returns the per-key lock for an instance, creating it lazily.
    fn key_lock(&self, instance_id: &InstanceId) -> Result<Arc<Mutex<()>>, CacheError> {
        let mut guard = self.key_locks.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(Arc::clone(guard.entry(instance_id.clone()).or_default()))
    }
}
