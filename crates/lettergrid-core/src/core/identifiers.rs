// crates/lettergrid-core/src/core/identifiers.rs
// ============================================================================
// Module: Lettergrid Identifiers
// Description: Canonical identifiers for activities, instances, and learners.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout the activity provider.
//! [`ActivityId`] is the opaque key supplied by the orchestrating platform and
//! is validated at construction: surrounding whitespace is trimmed and empty
//! input is rejected before any state can be touched. [`InstanceId`] is the
//! internal key derived from an activity identifier; the derivation is
//! injective, so distinct activities can never share an instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing external identifiers.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier was empty or contained only whitespace.
    #[error("activity identifier must not be empty")]
    Empty,
}

// ============================================================================
// SECTION: Activity Identifier
// ============================================================================

/// Opaque activity identifier supplied by the orchestrating platform.
///
/// # Invariants
/// - Never empty; surrounding whitespace is trimmed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct ActivityId(String);

impl ActivityId {
    /// Parses an activity identifier from untrusted external input.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Empty`] when the trimmed input is empty.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ActivityId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ActivityId> for String {
    fn from(value: ActivityId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Instance Identifier
// ============================================================================

/// Internal instance identifier derived from an activity identifier.
///
/// # Invariants
/// - Derivation is injective: one activity maps to exactly one instance id and
///   two distinct activities can never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Derives the canonical instance identifier for an activity.
    #[must_use]
    pub fn for_activity(activity_id: &ActivityId) -> Self {
        Self(format!("inst-{activity_id}"))
    }

    /// Wraps a raw instance identifier loaded from the store.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: User Identifier
// ============================================================================

/// Optional learner identifier forwarded by the platform.
///
/// # Invariants
/// - Never empty; blank input normalizes to absence at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Normalizes a raw learner identifier; blank input becomes `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
