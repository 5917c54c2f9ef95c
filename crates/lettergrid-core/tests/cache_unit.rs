// crates/lettergrid-core/tests/cache_unit.rs
// ============================================================================
// Module: Config Cache Unit Tests
// Description: Cache/store coherence behavior for the caching proxy.
// Purpose: Validate write-through ordering, lazy loads, and per-key builds.
// Dependencies: lettergrid-core
// ============================================================================

//! ## Overview
//! Exercises the caching proxy invariants:
//! - A put reflects in subsequent gets without touching the store.
//! - A fresh cache over a retained store lazily reloads prior writes.
//! - A failed store put never updates the in-memory cache.
//! - Creation runs at most once per key under concurrency.

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
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use lettergrid_core::ActivityEvent;
use lettergrid_core::ActivityId;
use lettergrid_core::CacheError;
use lettergrid_core::ConfigCache;
use lettergrid_core::EventFilter;
use lettergrid_core::GameConfig;
use lettergrid_core::InMemoryInstanceStore;
use lettergrid_core::InstanceId;
use lettergrid_core::InstanceRecord;
use lettergrid_core::InstanceStore;
use lettergrid_core::SharedInstanceStore;
use lettergrid_core::StoreError;
use lettergrid_core::Timestamp;

// ============================================================================
// SECTION: Test Stores
// ============================================================================

/// Store wrapper counting reads and writes.
#[derive(Clone)]
struct CountingStore {
    /// Wrapped in-memory store.
    inner: InMemoryInstanceStore,
    /// Number of `get_instance` calls.
    gets: Arc<AtomicUsize>,
    /// Number of `put_instance` calls.
    puts: Arc<AtomicUsize>,
}

impl CountingStore {
    fn new(inner: InMemoryInstanceStore) -> Self {
        Self {
            inner,
            gets: Arc::new(AtomicUsize::new(0)),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl InstanceStore for CountingStore {
    fn get_instance(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_instance(instance_id)
    }

    fn put_instance(&self, record: &InstanceRecord) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_instance(record)
    }

    fn append_event(&self, event: &ActivityEvent) -> Result<(), StoreError> {
        self.inner.append_event(event)
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError> {
        self.inner.list_events(filter)
    }
}

/// Store whose writes always fail.
struct FailingStore;

impl InstanceStore for FailingStore {
    fn get_instance(
        &self,
        _instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, StoreError> {
        Ok(None)
    }

    fn put_instance(&self, _record: &InstanceRecord) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".to_string()))
    }

    fn append_event(&self, _event: &ActivityEvent) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".to_string()))
    }

    fn list_events(&self, _filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_record(activity: &str) -> InstanceRecord {
    let activity_id = ActivityId::parse(activity).expect("valid activity id");
    let instance_id = InstanceId::for_activity(&activity_id);
    InstanceRecord::new(
        instance_id,
        activity_id,
        Timestamp::from_unix_millis(1_700_000_000_000),
        GameConfig {
            size: 10,
            words: vec!["FACADE".to_string(), "PROXY".to_string()],
            seed: 42,
        },
    )
}

// ============================================================================
// SECTION: Coherence Tests
// ============================================================================

#[test]
fn get_after_put_skips_the_store() {
    let counting = CountingStore::new(InMemoryInstanceStore::new());
    let gets = Arc::clone(&counting.gets);
    let cache = ConfigCache::new(SharedInstanceStore::from_store(counting));

    let record = sample_record("TESTE123");
    cache.put(&record).expect("put");
    let loaded = cache.get(&record.instance_id).expect("get").expect("present");
    assert_eq!(loaded, record);
    assert_eq!(gets.load(Ordering::SeqCst), 0);
}

#[test]
fn fresh_cache_lazily_reloads_from_the_store() {
    let store = InMemoryInstanceStore::new();
    let record = sample_record("TESTE123");
    {
        let cache = ConfigCache::new(SharedInstanceStore::from_store(store.clone()));
        cache.put(&record).expect("put");
    }
    // Simulated restart: fresh cache, same durable store.
    let cache = ConfigCache::new(SharedInstanceStore::from_store(store));
    let loaded = cache.get(&record.instance_id).expect("get").expect("present");
    assert_eq!(loaded, record);
}

#[test]
fn miss_in_cache_and_store_is_not_an_error() {
    let cache = ConfigCache::new(SharedInstanceStore::from_store(InMemoryInstanceStore::new()));
    let record = sample_record("ABSENT");
    assert!(cache.get(&record.instance_id).expect("get").is_none());
}

#[test]
fn failed_put_leaves_the_cache_untouched() {
    let cache = ConfigCache::new(SharedInstanceStore::from_store(FailingStore));
    let record = sample_record("TESTE123");
    let err = cache.put(&record).expect_err("put must fail");
    assert!(matches!(err, CacheError::Store(StoreError::Io(_))));
    // The cache must not be ahead of durable state.
    assert!(cache.get(&record.instance_id).expect("get").is_none());
}

#[test]
fn get_or_create_initializes_at_most_once() {
    let counting = CountingStore::new(InMemoryInstanceStore::new());
    let puts = Arc::clone(&counting.puts);
    let cache = Arc::new(ConfigCache::new(SharedInstanceStore::from_store(counting)));
    let builds = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let builds = Arc::clone(&builds);
        handles.push(thread::spawn(move || {
            let record = sample_record("SHARED");
            let id = record.instance_id.clone();
            cache
                .get_or_create::<CacheError, _>(&id, || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(record)
                })
                .expect("get_or_create")
        }));
    }
    let records: Vec<_> = handles.into_iter().map(|h| h.join().expect("join")).collect();
    assert!(records.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(puts.load(Ordering::SeqCst), 1);
}

#[test]
fn events_pass_through_the_proxy() {
    let cache = ConfigCache::new(SharedInstanceStore::from_store(InMemoryInstanceStore::new()));
    let activity_id = ActivityId::parse("TESTE123").expect("valid activity id");
    let event = ActivityEvent {
        time: Timestamp::from_unix_millis(1),
        kind: lettergrid_core::EventKind::GameAccess,
        activity_id: activity_id.clone(),
        user_id: None,
    };
    cache.append_event(&event).expect("append");
    let listed =
        cache.list_events(&EventFilter::for_activity(activity_id)).expect("list");
    assert_eq!(listed, vec![event]);
}
