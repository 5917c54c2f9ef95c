// crates/lettergrid-core/src/core/builder.rs
// ============================================================================
// Module: Game Configuration Builder
// Description: Deterministic construction of instance configurations.
// Purpose: Apply defaults and validated overrides with an activity-derived seed.
// Dependencies: serde_json, sha2
// ============================================================================

//! ## Overview
//! The builder is a pure function from activity identifier plus overrides to a
//! [`GameConfig`]. Defaults are applied first, then overrides win per key.
//! Validation is strict and happens before anything else: an unknown override
//! key or an ill-typed value fails the whole build with no partial effects.
//! The layout seed is derived from the activity identifier via SHA-256 so
//! repeated builds for the same activity produce identical output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::game::DEFAULT_GRID_SIZE;
use crate::core::game::DEFAULT_WORDS;
use crate::core::game::GameConfig;
use crate::core::game::MAX_GRID_SIZE;
use crate::core::game::MAX_WORDS;
use crate::core::game::MIN_GRID_SIZE;
use crate::core::game::PARAM_SIZE;
use crate::core::game::PARAM_WORDS;
use crate::core::game::ParamOverrides;
use crate::core::identifiers::ActivityId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while validating or applying parameter overrides.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A failed build leaves no partial state anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// An override key is not part of the parameter schema.
    #[error("unknown override parameter: {key}")]
    UnknownParam {
        /// The rejected override key.
        key: String,
    },
    /// An override value is ill-typed or out of range.
    #[error("invalid value for parameter {key}: {reason}")]
    InvalidValue {
        /// The override key with the invalid value.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Deterministic builder for word-search configurations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameConfigBuilder;

impl GameConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates overrides without constructing a configuration.
    ///
    /// The facade calls this before touching the registry or cache so a
    /// rejected build cannot leave a resolution side effect behind.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for unknown keys or ill-typed values.
    pub fn validate(&self, overrides: &ParamOverrides) -> Result<(), BuildError> {
        for (key, value) in overrides {
            match key.as_str() {
                PARAM_SIZE => {
                    parse_size(value)?;
                }
                PARAM_WORDS => {
                    parse_words(value, resolved_size(overrides)?)?;
                }
                other => {
                    return Err(BuildError::UnknownParam {
                        key: other.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Builds the configuration for an activity, overlaying overrides on defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for unknown keys or ill-typed values.
    pub fn build(
        &self,
        activity_id: &ActivityId,
        overrides: &ParamOverrides,
    ) -> Result<GameConfig, BuildError> {
        self.validate(overrides)?;
        let size = resolved_size(overrides)?;
        let words = match overrides.get(PARAM_WORDS) {
            Some(value) => parse_words(value, size)?,
            None => DEFAULT_WORDS.iter().map(ToString::to_string).collect(),
        };
        Ok(GameConfig {
            size,
            words,
            seed: seed_for(activity_id),
        })
    }
}

/// Derives the layout seed from the activity identifier.
///
/// The first eight bytes of the SHA-256 digest keep the derivation stable
/// across processes and platforms.
#[must_use]
pub fn seed_for(activity_id: &ActivityId) -> u64 {
    let digest = Sha256::digest(activity_id.as_str().as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

// ============================================================================
// SECTION: Override Parsing
// ============================================================================

/// Returns the effective grid size after overrides.
fn resolved_size(overrides: &ParamOverrides) -> Result<u32, BuildError> {
    overrides.get(PARAM_SIZE).map_or(Ok(DEFAULT_GRID_SIZE), parse_size)
}

/// Parses and range-checks a grid size override.
fn parse_size(value: &Value) -> Result<u32, BuildError> {
    let size = value
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| BuildError::InvalidValue {
            key: PARAM_SIZE.to_string(),
            reason: "expected an integer".to_string(),
        })?;
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(BuildError::InvalidValue {
            key: PARAM_SIZE.to_string(),
            reason: format!("must be within {MIN_GRID_SIZE}..={MAX_GRID_SIZE}"),
        });
    }
    Ok(size)
}

/// Parses a word list override, checking each word fits the grid.
fn parse_words(value: &Value, size: u32) -> Result<Vec<String>, BuildError> {
    let entries = value.as_array().ok_or_else(|| BuildError::InvalidValue {
        key: PARAM_WORDS.to_string(),
        reason: "expected a list of strings".to_string(),
    })?;
    if entries.is_empty() {
        return Err(BuildError::InvalidValue {
            key: PARAM_WORDS.to_string(),
            reason: "word list must not be empty".to_string(),
        });
    }
    if entries.len() > MAX_WORDS {
        return Err(BuildError::InvalidValue {
            key: PARAM_WORDS.to_string(),
            reason: format!("word list exceeds {MAX_WORDS} entries"),
        });
    }
    let mut words = Vec::with_capacity(entries.len());
    for entry in entries {
        let raw = entry.as_str().ok_or_else(|| BuildError::InvalidValue {
            key: PARAM_WORDS.to_string(),
            reason: "expected a list of strings".to_string(),
        })?;
        let word = raw.trim().to_uppercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BuildError::InvalidValue {
                key: PARAM_WORDS.to_string(),
                reason: format!("word '{raw}' must be non-empty and alphabetic"),
            });
        }
        if word.len() > size as usize {
            return Err(BuildError::InvalidValue {
                key: PARAM_WORDS.to_string(),
                reason: format!("word '{word}' does not fit a {size}x{size} grid"),
            });
        }
        words.push(word);
    }
    Ok(words)
}
