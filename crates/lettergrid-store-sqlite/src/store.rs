// crates/lettergrid-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Instance Store
// Description: Durable InstanceStore backed by SQLite WAL.
// Purpose: Persist instance records and activity events across restarts.
// Dependencies: lettergrid-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`InstanceStore`] using `SQLite`. Instance
//! records are serialized to JSON and stored keyed by instance identifier, so
//! the record shape can evolve without table migrations. Activity events go to
//! an append-only table ordered by an autoincrement sequence. Opens fail
//! closed on schema version mismatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use lettergrid_core::ActivityEvent;
use lettergrid_core::EventFilter;
use lettergrid_core::InstanceId;
use lettergrid_core::InstanceRecord;
use lettergrid_core::InstanceStore;
use lettergrid_core::StoreError;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` instance store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config for `path` with default pragmas.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw record payloads.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::VersionMismatch(message) | SqliteStoreError::Invalid(message) => {
                Self::Invalid(message)
            }
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed instance store with WAL support.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Records round-trip through serde JSON; a payload that no longer parses
///   surfaces as [`StoreError::Corrupt`].
#[derive(Debug)]
pub struct SqliteInstanceStore {
    /// Shared connection guarded by a mutex.
    connection: Mutex<Connection>,
}

impl SqliteInstanceStore {
    /// Opens an `SQLite`-backed instance store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or when the stored schema version does not match.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(config)?;
        initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Verifies the store can execute a simple SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the mutex is poisoned or the query
    /// fails.
    pub fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
        guard
            .query_row("SELECT 1", [], |_row| Ok(()))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }
}

impl InstanceStore for SqliteInstanceStore {
    fn get_instance(&self, instance_id: &InstanceId) -> Result<Option<InstanceRecord>, StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("sqlite mutex poisoned".to_string()))?;
        let payload: Option<String> = guard
            .query_row(
                "SELECT payload FROM instances WHERE instance_id = ?1",
                params![instance_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| StoreError::Store(err.to_string()))?;
        drop(guard);
        let Some(payload) = payload else {
            return Ok(None);
        };
        let record: InstanceRecord = serde_json::from_str(&payload)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;
        if record.instance_id != *instance_id {
            return Err(StoreError::Corrupt(
                "instance_id mismatch between key and payload".to_string(),
            ));
        }
        Ok(Some(record))
    }

    fn put_instance(&self, record: &InstanceRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)
            .map_err(|err| StoreError::Invalid(err.to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("sqlite mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO instances (instance_id, activity_id, payload) VALUES (?1, ?2, ?3)
                 ON CONFLICT(instance_id) DO UPDATE SET activity_id = ?2, payload = ?3",
                params![record.instance_id.as_str(), record.activity_id.as_str(), payload],
            )
            .map_err(|err| StoreError::Store(err.to_string()))?;
        Ok(())
    }

    fn append_event(&self, event: &ActivityEvent) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(event).map_err(|err| StoreError::Invalid(err.to_string()))?;
        let kind = serde_json::to_value(event.kind)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| StoreError::Invalid("unencodable event kind".to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("sqlite mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO events (time_ms, kind, activity_id, user_id, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.time.unix_millis(),
                    kind,
                    event.activity_id.as_str(),
                    event.user_id.as_ref().map(|user| user.as_str().to_string()),
                    payload
                ],
            )
            .map_err(|err| StoreError::Store(err.to_string()))?;
        Ok(())
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>, StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("sqlite mutex poisoned".to_string()))?;
        let mut stmt = guard
            .prepare(
                "SELECT payload FROM events
                 WHERE (?1 IS NULL OR activity_id = ?1)
                 ORDER BY seq ASC",
            )
            .map_err(|err| StoreError::Store(err.to_string()))?;
        let activity = filter.activity_id.as_ref().map(|id| id.as_str().to_string());
        let rows = stmt
            .query_map(params![activity], |row| row.get::<_, String>(0))
            .map_err(|err| StoreError::Store(err.to_string()))?;
        let mut events = Vec::new();
        for row in rows {
            let payload = row.map_err(|err| StoreError::Store(err.to_string()))?;
            let event: ActivityEvent = serde_json::from_str(&payload)
                .map_err(|err| StoreError::Corrupt(err.to_string()))?;
            if filter.matches(&event) {
                events.push(event);
            }
        }
        drop(stmt);
        drop(guard);
        Ok(events)
    }
}

// ============================================================================
// SECTION: Connection Setup
// ============================================================================

/// Rejects store paths that point at an existing directory.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(format!(
            "store path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Creates the parent directory for the database file when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    }
    Ok(())
}

/// Opens a connection with the configured pragmas applied.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let connection =
        Connection::open(&config.path).map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    let busy_timeout = i64::try_from(config.busy_timeout_ms)
        .map_err(|_| SqliteStoreError::Invalid("busy_timeout_ms out of range".to_string()))?;
    connection
        .pragma_update(None, "busy_timeout", busy_timeout)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "journal_mode", config.journal_mode.pragma_value())
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "synchronous", config.sync_mode.pragma_value())
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "foreign_keys", "on")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(connection)
}

/// Creates tables on first open and enforces the schema version afterwards.
fn initialize_schema(connection: &Connection) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS instances (
                 instance_id TEXT PRIMARY KEY,
                 activity_id TEXT NOT NULL,
                 payload TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS events (
                 seq INTEGER PRIMARY KEY AUTOINCREMENT,
                 time_ms INTEGER NOT NULL,
                 kind TEXT NOT NULL,
                 activity_id TEXT NOT NULL,
                 user_id TEXT,
                 payload TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS events_activity_idx ON events (activity_id, seq);",
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let stored: Option<String> = connection
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match stored {
        Some(value) => {
            let version: i64 = value.parse().map_err(|_| {
                SqliteStoreError::Invalid(format!("unparseable schema version: {value}"))
            })?;
            if version != SCHEMA_VERSION {
                return Err(SqliteStoreError::VersionMismatch(format!(
                    "expected schema version {SCHEMA_VERSION}, found {version}"
                )));
            }
        }
        None => {
            connection
                .execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION.to_string()],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
    }
    Ok(())
}
