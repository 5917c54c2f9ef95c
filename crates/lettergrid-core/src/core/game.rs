// crates/lettergrid-core/src/core/game.rs
// ============================================================================
// Module: Word-Search Game Configuration
// Description: Built game configuration and the advertised parameter schema.
// Purpose: Define the canonical instance configuration shape and its bounds.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`GameConfig`] is the word-search configuration built once per instance:
//! grid size, word list, and the seed used for board layout. Configurations
//! are immutable after construction; the seed is derived from the activity
//! identifier so rebuilding for the same activity is reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default grid dimension for a new instance.
pub const DEFAULT_GRID_SIZE: u32 = 10;
/// Minimum accepted grid dimension.
pub const MIN_GRID_SIZE: u32 = 5;
/// Maximum accepted grid dimension.
pub const MAX_GRID_SIZE: u32 = 20;
/// Maximum number of words accepted in a word list override.
pub const MAX_WORDS: usize = 64;
/// Default word list for a new instance.
pub const DEFAULT_WORDS: [&str; 5] = ["APSI", "INVENIRA", "FACADE", "ADAPTER", "PROXY"];

/// Override key for the grid dimension.
pub(crate) const PARAM_SIZE: &str = "size";
/// Override key for the word list.
pub(crate) const PARAM_WORDS: &str = "words";

// ============================================================================
// SECTION: Game Configuration
// ============================================================================

/// Caller-supplied parameter overrides, keyed by parameter name.
pub type ParamOverrides = BTreeMap<String, Value>;

/// Built word-search configuration for one instance.
///
/// # Invariants
/// - `size` is within [`MIN_GRID_SIZE`]..=[`MAX_GRID_SIZE`].
/// - `words` is non-empty; every word is uppercase alphabetic and fits `size`.
/// - `seed` is derived from the activity identifier, never ambient randomness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid dimension (the board is `size` x `size`).
    pub size: u32,
    /// Words hidden in the grid.
    pub words: Vec<String>,
    /// Layout seed derived from the activity identifier.
    pub seed: u64,
}

impl GameConfig {
    /// Serializes the configuration as a parameter-name to value mapping.
    #[must_use]
    pub fn to_values(&self) -> BTreeMap<String, Value> {
        let mut values = BTreeMap::new();
        values.insert(PARAM_SIZE.to_string(), json!(self.size));
        values.insert(PARAM_WORDS.to_string(), json!(self.words));
        values.insert("seed".to_string(), json!(self.seed));
        values
    }
}

// ============================================================================
// SECTION: Parameter Schema
// ============================================================================

/// One entry in the advertised parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as accepted in overrides.
    pub name: String,
    /// Parameter type label (`int`, `list[str]`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Default value applied when the parameter is not overridden.
    pub default: Value,
    /// Inclusive lower bound, when the parameter is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Inclusive upper bound, when the parameter is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// Parameter schema advertised to the orchestrating platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsSchema {
    /// Human-readable activity name.
    pub activity: String,
    /// Configurable parameters, in display order.
    pub params: Vec<ParamSpec>,
}

/// Returns the parameter schema for the word-search activity.
#[must_use]
pub fn params_schema() -> ParamsSchema {
    ParamsSchema {
        activity: "Word Search".to_string(),
        params: vec![
            ParamSpec {
                name: PARAM_SIZE.to_string(),
                kind: "int".to_string(),
                default: json!(DEFAULT_GRID_SIZE),
                min: Some(MIN_GRID_SIZE),
                max: Some(MAX_GRID_SIZE),
            },
            ParamSpec {
                name: PARAM_WORDS.to_string(),
                kind: "list[str]".to_string(),
                default: json!(DEFAULT_WORDS),
                min: None,
                max: None,
            },
        ],
    }
}
