// crates/lettergrid-core/src/core/instance.rs
// ============================================================================
// Module: Instance Records and Events
// Description: Persisted per-instance state and the append-only event log.
// Purpose: Capture the build-once configuration plus access-tracking fields.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`InstanceRecord`] is the value persisted per [`InstanceId`]: the built
//! configuration plus access-tracking counters. The configuration is
//! build-once; only the access-tracking use case mutates a record after
//! creation. [`ActivityEvent`] entries are append-only and feed the analytics
//! queries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::game::GameConfig;
use crate::core::identifiers::ActivityId;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Instance Record
// ============================================================================

/// Persisted state for one game instance.
///
/// # Invariants
/// - `instance_id` is the canonical derivation for `activity_id`.
/// - `game` is immutable after construction.
/// - Only [`InstanceRecord::record_access`] mutates the tracking fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Internal instance identifier.
    pub instance_id: InstanceId,
    /// External activity identifier this instance serves.
    pub activity_id: ActivityId,
    /// Creation time supplied by the host clock.
    pub created_at: Timestamp,
    /// Built game configuration.
    pub game: GameConfig,
    /// Number of recorded game accesses.
    pub access_count: u64,
    /// Time of the most recent access, when any.
    pub last_access: Option<Timestamp>,
}

impl InstanceRecord {
    /// Creates a fresh record with zeroed tracking fields.
    #[must_use]
    pub const fn new(
        instance_id: InstanceId,
        activity_id: ActivityId,
        created_at: Timestamp,
        game: GameConfig,
    ) -> Self {
        Self {
            instance_id,
            activity_id,
            created_at,
            game,
            access_count: 0,
            last_access: None,
        }
    }

    /// Records one game access at the given time.
    pub const fn record_access(&mut self, at: Timestamp) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_access = Some(at);
    }
}

// ============================================================================
// SECTION: Activity Events
// ============================================================================

/// Event kinds recorded in the activity log.
///
/// # Invariants
/// - Variants are stable for serialization and analytics matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A learner opened the game entry page.
    GameAccess,
}

/// Append-only event recorded against an activity.
///
/// # Invariants
/// - Events are never mutated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Event time supplied by the host clock.
    pub time: Timestamp,
    /// Event kind.
    pub kind: EventKind,
    /// Activity the event belongs to.
    pub activity_id: ActivityId,
    /// Learner involved, when known.
    pub user_id: Option<UserId>,
}
