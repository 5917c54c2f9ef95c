// crates/lettergrid-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Instance Store Unit Tests
// Description: Persistence behavior for the SQLite-backed store.
// Purpose: Validate round-trips, reopen durability, and event filtering.
// Dependencies: lettergrid-core, lettergrid-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Exercises the durable store through the [`InstanceStore`] contract: record
//! round-trips, overwrite semantics, persistence across reopen, event ordering
//! and filtering, and the fail-closed schema version check.

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

use lettergrid_core::ActivityEvent;
use lettergrid_core::ActivityId;
use lettergrid_core::EventFilter;
use lettergrid_core::EventKind;
use lettergrid_core::GameConfig;
use lettergrid_core::InstanceId;
use lettergrid_core::InstanceRecord;
use lettergrid_core::InstanceStore;
use lettergrid_core::Timestamp;
use lettergrid_core::UserId;
use lettergrid_store_sqlite::SqliteInstanceStore;
use lettergrid_store_sqlite::SqliteStoreConfig;
use lettergrid_store_sqlite::SqliteStoreError;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn temp_store(dir: &TempDir) -> SqliteInstanceStore {
    let config = SqliteStoreConfig::for_path(dir.path().join("provider.db"));
    SqliteInstanceStore::new(&config).expect("open store")
}

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

fn sample_event(activity: &str, user: Option<&str>, at_millis: i64) -> ActivityEvent {
    ActivityEvent {
        time: Timestamp::from_unix_millis(at_millis),
        kind: EventKind::GameAccess,
        activity_id: ActivityId::parse(activity).expect("valid activity id"),
        user_id: user.and_then(UserId::parse),
    }
}

// ============================================================================
// SECTION: Record Tests
// ============================================================================

#[test]
fn round_trips_an_instance_record() {
    let dir = TempDir::new().expect("tempdir");
    let store = temp_store(&dir);
    let record = sample_record("TESTE123");
    store.put_instance(&record).expect("put");
    let loaded = store.get_instance(&record.instance_id).expect("get").expect("present");
    assert_eq!(loaded, record);
}

#[test]
fn missing_instance_is_none() {
    let dir = TempDir::new().expect("tempdir");
    let store = temp_store(&dir);
    let absent = InstanceId::for_activity(&ActivityId::parse("ABSENT").expect("id"));
    assert!(store.get_instance(&absent).expect("get").is_none());
}

#[test]
fn put_overwrites_prior_state() {
    let dir = TempDir::new().expect("tempdir");
    let store = temp_store(&dir);
    let mut record = sample_record("TESTE123");
    store.put_instance(&record).expect("put");
    record.record_access(Timestamp::from_unix_millis(1_700_000_001_000));
    store.put_instance(&record).expect("put again");
    let loaded = store.get_instance(&record.instance_id).expect("get").expect("present");
    assert_eq!(loaded.access_count, 1);
    assert!(loaded.last_access.is_some());
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let record = sample_record("TESTE123");
    {
        let store = temp_store(&dir);
        store.put_instance(&record).expect("put");
    }
    let store = temp_store(&dir);
    let loaded = store.get_instance(&record.instance_id).expect("get").expect("present");
    assert_eq!(loaded, record);
}

#[test]
fn instance_exists_follows_the_record() {
    let dir = TempDir::new().expect("tempdir");
    let store = temp_store(&dir);
    let record = sample_record("TESTE123");
    assert!(!store.instance_exists(&record.instance_id).expect("exists"));
    store.put_instance(&record).expect("put");
    assert!(store.instance_exists(&record.instance_id).expect("exists"));
}

// ============================================================================
// SECTION: Event Tests
// ============================================================================

#[test]
fn events_filter_by_activity_and_user() {
    let dir = TempDir::new().expect("tempdir");
    let store = temp_store(&dir);
    store.append_event(&sample_event("A1", Some("1001"), 1)).expect("append");
    store.append_event(&sample_event("A1", Some("1002"), 2)).expect("append");
    store.append_event(&sample_event("A1", None, 3)).expect("append");
    store.append_event(&sample_event("B2", Some("1001"), 4)).expect("append");

    let activity = ActivityId::parse("A1").expect("id");
    let all = store.list_events(&EventFilter::for_activity(activity.clone())).expect("list");
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|pair| pair[0].time.unix_millis() <= pair[1].time.unix_millis()));

    let user = UserId::parse("1001").expect("user");
    let filtered = store
        .list_events(&EventFilter::for_activity(activity).with_user(user))
        .expect("list");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].time.unix_millis(), 1);
}

#[test]
fn events_survive_reopen_in_order() {
    let dir = TempDir::new().expect("tempdir");
    {
        let store = temp_store(&dir);
        store.append_event(&sample_event("A1", None, 10)).expect("append");
        store.append_event(&sample_event("A1", None, 20)).expect("append");
    }
    let store = temp_store(&dir);
    let events = store
        .list_events(&EventFilter::for_activity(ActivityId::parse("A1").expect("id")))
        .expect("list");
    let times: Vec<_> = events.iter().map(|event| event.time.unix_millis()).collect();
    assert_eq!(times, vec![10, 20]);
}

// ============================================================================
// SECTION: Open Tests
// ============================================================================

#[test]
fn rejects_a_directory_path() {
    let dir = TempDir::new().expect("tempdir");
    let config = SqliteStoreConfig::for_path(dir.path());
    assert!(matches!(
        SqliteInstanceStore::new(&config).expect_err("must fail"),
        SqliteStoreError::Invalid(_)
    ));
}

#[test]
fn creates_missing_parent_directories() {
    let dir = TempDir::new().expect("tempdir");
    let config = SqliteStoreConfig::for_path(dir.path().join("nested/deep/provider.db"));
    let store = SqliteInstanceStore::new(&config).expect("open store");
    store.check_connection().expect("ready");
}

#[test]
fn rejects_a_future_schema_version() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("provider.db");
    {
        let config = SqliteStoreConfig::for_path(&path);
        SqliteInstanceStore::new(&config).expect("open store");
    }
    {
        let connection = rusqlite::Connection::open(&path).expect("raw open");
        connection
            .execute("UPDATE meta SET value = '99' WHERE key = 'schema_version'", [])
            .expect("bump version");
    }
    let config = SqliteStoreConfig::for_path(&path);
    assert!(matches!(
        SqliteInstanceStore::new(&config).expect_err("must fail"),
        SqliteStoreError::VersionMismatch(_)
    ));
}
