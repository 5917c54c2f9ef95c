// crates/lettergrid-core/src/core/time.rs
// ============================================================================
// Module: Lettergrid Time Model
// Description: Canonical timestamp representation for instance records and events.
// Purpose: Provide explicit time values so the core stays deterministic.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The core never reads wall-clock time directly; callers supply timestamps
//! through the [`crate::interfaces::Clock`] interface. Timestamps are unix
//! epoch milliseconds with an RFC 3339 rendering for external payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp used in instance records and the event log.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Monotonicity is a caller responsibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn unix_millis(self) -> i64 {
        self.0
    }

    /// Renders the timestamp as an RFC 3339 string for external payloads.
    ///
    /// Falls back to the raw millisecond value when the timestamp is outside
    /// the representable calendar range.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        let nanos = i128::from(self.0) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok())
            .unwrap_or_else(|| self.0.to_string())
    }
}
