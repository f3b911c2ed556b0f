//! Surface rule trees, matching vanilla's `SurfaceRules`.
//!
//! Only the structure is modelled: rules decode from and encode to their
//! datapack JSON form. Applying them to a chunk is out of scope here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::density::DecodeError;
use crate::identifier::Identifier;

const RULE: &str = "surface rule";
const CONDITION: &str = "surface rule condition";

const RULE_TYPES: &[&str] = &["bandlands", "block", "sequence", "condition"];
const CONDITION_TYPES: &[&str] = &[
    "biome",
    "noise_threshold",
    "vertical_gradient",
    "y_above",
    "water",
    "temperature",
    "steep",
    "not",
    "hole",
    "above_preliminary_surface",
    "stone_depth",
];

/// A block state as written in datapacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStateJson {
    /// Block key.
    #[serde(rename = "Name")]
    pub name: Identifier,
    /// Property values by name.
    #[serde(rename = "Properties", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// A surface rule node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceRule {
    /// Badlands terracotta bands.
    #[serde(rename = "minecraft:bandlands", alias = "bandlands")]
    Bandlands {},
    /// Place a fixed block.
    #[serde(rename = "minecraft:block", alias = "block")]
    Block {
        /// The block placed.
        result_state: BlockStateJson,
    },
    /// First rule that applies wins.
    #[serde(rename = "minecraft:sequence", alias = "sequence")]
    Sequence {
        /// Rules in priority order.
        sequence: Vec<SurfaceRule>,
    },
    /// Run `then_run` where `if_true` holds.
    #[serde(rename = "minecraft:condition", alias = "condition")]
    Condition {
        /// The guard.
        if_true: ConditionSource,
        /// The guarded rule.
        then_run: Box<SurfaceRule>,
    },
}

/// Which face a `stone_depth` condition measures from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaveSurface {
    /// Measured down from the surface above.
    Floor,
    /// Measured up from the surface below.
    Ceiling,
}

/// A height reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    /// A fixed Y.
    Absolute(i32),
    /// Offset up from the dimension's minimum Y.
    AboveBottom(i32),
    /// Offset down from the dimension's maximum Y.
    BelowTop(i32),
}

impl VerticalAnchor {
    /// Resolve against a dimension's height range.
    #[must_use]
    pub const fn resolve_y(self, min_y: i32, height: i32) -> i32 {
        match self {
            Self::Absolute(y) => y,
            Self::AboveBottom(offset) => min_y + offset,
            Self::BelowTop(offset) => min_y + height - 1 - offset,
        }
    }
}

/// A surface rule guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConditionSource {
    /// The column's biome is one of `biome_is`.
    #[serde(rename = "minecraft:biome", alias = "biome")]
    Biome {
        /// Accepted biomes.
        biome_is: Vec<Identifier>,
    },
    /// A 2D noise sample lies in `[min_threshold, max_threshold]`.
    #[serde(rename = "minecraft:noise_threshold", alias = "noise_threshold")]
    NoiseThreshold {
        /// Noise key.
        noise: Identifier,
        /// Lower bound.
        min_threshold: f64,
        /// Upper bound.
        max_threshold: f64,
    },
    /// Random fade between two heights.
    #[serde(rename = "minecraft:vertical_gradient", alias = "vertical_gradient")]
    VerticalGradient {
        /// Seed string for the positional random.
        random_name: String,
        /// Always true at and below.
        true_at_and_below: VerticalAnchor,
        /// Always false at and above.
        false_at_and_above: VerticalAnchor,
    },
    /// The block is above `anchor`.
    #[serde(rename = "minecraft:y_above", alias = "y_above")]
    YAbove {
        /// Threshold height.
        anchor: VerticalAnchor,
        /// Multiplier on the surface depth.
        surface_depth_multiplier: i32,
        /// Add the stone depth to the threshold.
        add_stone_depth: bool,
    },
    /// The block is above the local water level.
    #[serde(rename = "minecraft:water", alias = "water")]
    Water {
        /// Offset from the water level.
        offset: i32,
        /// Multiplier on the surface depth.
        surface_depth_multiplier: i32,
        /// Add the stone depth to the threshold.
        add_stone_depth: bool,
    },
    /// The biome is cold enough to snow.
    #[serde(rename = "minecraft:temperature", alias = "temperature")]
    Temperature {},
    /// The column is steep.
    #[serde(rename = "minecraft:steep", alias = "steep")]
    Steep {},
    /// Negation.
    #[serde(rename = "minecraft:not", alias = "not")]
    Not {
        /// The negated condition.
        invert: Box<ConditionSource>,
    },
    /// The surface dips below the preliminary surface.
    #[serde(rename = "minecraft:hole", alias = "hole")]
    Hole {},
    /// The block is above the preliminary surface.
    #[serde(rename = "minecraft:above_preliminary_surface", alias = "above_preliminary_surface")]
    AbovePreliminarySurface {},
    /// Depth from the nearest floor or ceiling is within range.
    #[serde(rename = "minecraft:stone_depth", alias = "stone_depth")]
    StoneDepth {
        /// Depth offset.
        offset: i32,
        /// Add the surface depth.
        add_surface_depth: bool,
        /// Extra noise-driven depth.
        secondary_depth_range: i32,
        /// Floor or ceiling.
        surface_type: CaveSurface,
    },
}

impl SurfaceRule {
    /// Decode a rule tree.
    ///
    /// # Errors
    /// [`DecodeError::UnknownVariant`] for an unknown rule or condition type,
    /// otherwise [`DecodeError::MalformedStructure`].
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        check_rule(value)?;
        Self::deserialize(value).map_err(|e| DecodeError::malformed(RULE, e))
    }

    /// Encode to JSON.
    #[must_use]
    pub fn encode(&self) -> Value {
        // Only string map keys, so conversion cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl ConditionSource {
    /// Decode a condition.
    ///
    /// # Errors
    /// As [`SurfaceRule::decode`].
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        check_condition(value)?;
        Self::deserialize(value).map_err(|e| DecodeError::malformed(CONDITION, e))
    }

    /// Encode to JSON.
    #[must_use]
    pub fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The bare `"type"` of `value`, checked against `known`. Non-objects and
/// untyped objects are left for serde to reject.
fn checked_type<'a>(
    value: &'a Value,
    kind: &'static str,
    known: &[&str],
) -> Result<Option<&'a str>, DecodeError> {
    let Some(name) = value.get("type").and_then(Value::as_str) else {
        return Ok(None);
    };
    let bare = name.strip_prefix("minecraft:").unwrap_or(name);
    if known.contains(&bare) {
        Ok(Some(bare))
    } else {
        Err(DecodeError::UnknownVariant {
            kind,
            name: name.to_owned(),
        })
    }
}

fn check_rule(value: &Value) -> Result<(), DecodeError> {
    match checked_type(value, RULE, RULE_TYPES)? {
        Some("sequence") => value
            .get("sequence")
            .and_then(Value::as_array)
            .map_or(Ok(()), |rules| rules.iter().try_for_each(check_rule)),
        Some("condition") => {
            if let Some(condition) = value.get("if_true") {
                check_condition(condition)?;
            }
            value.get("then_run").map_or(Ok(()), check_rule)
        }
        _ => Ok(()),
    }
}

fn check_condition(value: &Value) -> Result<(), DecodeError> {
    match checked_type(value, CONDITION, CONDITION_TYPES)? {
        Some("not") => value.get("invert").map_or(Ok(()), check_condition),
        _ => Ok(()),
    }
}
