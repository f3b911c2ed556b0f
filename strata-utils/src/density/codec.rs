//! Structural decode/encode of density function trees from and to JSON values.
//!
//! Values in the datapack format are polymorphic:
//! - Bare number -> `constant`
//! - Bare string -> reference by key
//! - Object with `"type"` field -> typed node
//!
//! Decoding goes through a serde wire model and is then lowered to
//! [`DensityFunction`]. Encoding raises the tree back into the wire model.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

use crate::density::error::DecodeError;
use crate::density::types::{
    BlendDensity, Clamp, CubicSpline, DensityFunction, EndIslandsDensity, FindTopSurface, Mapped,
    MappedType, Marker, MarkerType, Noise, NoiseHolder, OldBlendedNoise, RangeChoice,
    RarityValueMapper, Shift, ShiftA, ShiftB, ShiftedNoise, Spline, SplinePoint, SplineValue,
    TwoArgType, TwoArgumentSimple, WeirdScaledSampler, YClampedGradient,
};
use crate::identifier::Identifier;
use crate::noise::BlendedNoiseParams;

const CONTEXT: &str = "density function";

/// Every `"type"` a density function object may carry, without namespace.
const KNOWN_TYPES: &[&str] = &[
    "constant",
    "y_clamped_gradient",
    "noise",
    "shifted_noise",
    "shift_a",
    "shift_b",
    "shift",
    "clamp",
    "abs",
    "square",
    "cube",
    "half_negative",
    "quarter_negative",
    "invert",
    "squeeze",
    "add",
    "mul",
    "min",
    "max",
    "spline",
    "range_choice",
    "interpolated",
    "flat_cache",
    "cache_once",
    "cache_2d",
    "cache_all_in_cell",
    "blend_offset",
    "blend_alpha",
    "blend_density",
    "beardifier",
    "end_islands",
    "weird_scaled_sampler",
    "old_blended_noise",
    "find_top_surface",
];

// ── Wire model ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DensityFunctionJson {
    Constant(f64),
    Reference(Identifier),
    Data(Box<DensityFunctionData>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum DensityFunctionData {
    #[serde(rename = "minecraft:constant", alias = "constant")]
    Constant { argument: f64 },
    #[serde(rename = "minecraft:y_clamped_gradient", alias = "y_clamped_gradient")]
    YClampedGradient {
        from_y: i32,
        to_y: i32,
        from_value: f64,
        to_value: f64,
    },
    #[serde(rename = "minecraft:noise", alias = "noise")]
    Noise {
        noise: Identifier,
        xz_scale: f64,
        y_scale: f64,
    },
    #[serde(rename = "minecraft:shifted_noise", alias = "shifted_noise")]
    ShiftedNoise {
        shift_x: DensityFunctionJson,
        shift_y: DensityFunctionJson,
        shift_z: DensityFunctionJson,
        xz_scale: f64,
        y_scale: f64,
        noise: Identifier,
    },
    #[serde(rename = "minecraft:shift_a", alias = "shift_a")]
    ShiftA { argument: Identifier },
    #[serde(rename = "minecraft:shift_b", alias = "shift_b")]
    ShiftB { argument: Identifier },
    #[serde(rename = "minecraft:shift", alias = "shift")]
    Shift { argument: Identifier },
    #[serde(rename = "minecraft:clamp", alias = "clamp")]
    Clamp {
        input: DensityFunctionJson,
        min: f64,
        max: f64,
    },
    #[serde(rename = "minecraft:abs", alias = "abs")]
    Abs { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:square", alias = "square")]
    Square { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:cube", alias = "cube")]
    Cube { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:half_negative", alias = "half_negative")]
    HalfNegative { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:quarter_negative", alias = "quarter_negative")]
    QuarterNegative { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:invert", alias = "invert")]
    Invert { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:squeeze", alias = "squeeze")]
    Squeeze { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:add", alias = "add")]
    Add {
        argument1: DensityFunctionJson,
        argument2: DensityFunctionJson,
    },
    #[serde(rename = "minecraft:mul", alias = "mul")]
    Mul {
        argument1: DensityFunctionJson,
        argument2: DensityFunctionJson,
    },
    #[serde(rename = "minecraft:min", alias = "min")]
    Min {
        argument1: DensityFunctionJson,
        argument2: DensityFunctionJson,
    },
    #[serde(rename = "minecraft:max", alias = "max")]
    Max {
        argument1: DensityFunctionJson,
        argument2: DensityFunctionJson,
    },
    #[serde(rename = "minecraft:spline", alias = "spline")]
    Spline { spline: SplineJson },
    #[serde(rename = "minecraft:range_choice", alias = "range_choice")]
    RangeChoice {
        input: DensityFunctionJson,
        min_inclusive: f64,
        max_exclusive: f64,
        when_in_range: DensityFunctionJson,
        when_out_of_range: DensityFunctionJson,
    },
    #[serde(rename = "minecraft:interpolated", alias = "interpolated")]
    Interpolated { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:flat_cache", alias = "flat_cache")]
    FlatCache { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:cache_once", alias = "cache_once")]
    CacheOnce { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:cache_2d", alias = "cache_2d")]
    Cache2d { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:cache_all_in_cell", alias = "cache_all_in_cell")]
    CacheAllInCell { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:blend_offset", alias = "blend_offset")]
    BlendOffset {},
    #[serde(rename = "minecraft:blend_alpha", alias = "blend_alpha")]
    BlendAlpha {},
    #[serde(rename = "minecraft:blend_density", alias = "blend_density")]
    BlendDensity { argument: DensityFunctionJson },
    #[serde(rename = "minecraft:beardifier", alias = "beardifier")]
    Beardifier {},
    #[serde(rename = "minecraft:end_islands", alias = "end_islands")]
    EndIslands {},
    #[serde(rename = "minecraft:weird_scaled_sampler", alias = "weird_scaled_sampler")]
    WeirdScaledSampler {
        input: DensityFunctionJson,
        noise: Identifier,
        rarity_value_mapper: RarityValueMapper,
    },
    #[serde(rename = "minecraft:old_blended_noise", alias = "old_blended_noise")]
    OldBlendedNoise(BlendedNoiseParams),
    #[serde(rename = "minecraft:find_top_surface", alias = "find_top_surface")]
    FindTopSurface {
        density: DensityFunctionJson,
        upper_bound: DensityFunctionJson,
        lower_bound: i32,
        cell_height: i32,
    },
}

/// A spline value is a bare number or `{coordinate, points}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SplineJson {
    Constant(f32),
    Multipoint {
        coordinate: DensityFunctionJson,
        #[serde(default)]
        points: Vec<SplinePointJson>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SplinePointJson {
    location: f32,
    value: SplineJson,
    derivative: f32,
}

// ── Public entry points ─────────────────────────────────────────────────────

impl DensityFunction {
    /// Decode a tree from its JSON form.
    ///
    /// # Errors
    /// - [`DecodeError::UnknownVariant`] if any object names an unknown `"type"`.
    /// - [`DecodeError::InvalidIdentifier`] if a top-level string is not a key.
    /// - [`DecodeError::MalformedStructure`] for anything else that does not fit.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        if let Some(name) = find_unknown_type(value) {
            return Err(DecodeError::UnknownVariant {
                kind: CONTEXT,
                name,
            });
        }

        let wire = match value {
            Value::Number(n) => DensityFunctionJson::Constant(
                n.as_f64()
                    .ok_or_else(|| DecodeError::malformed(CONTEXT, "number out of range"))?,
            ),
            Value::String(s) => DensityFunctionJson::Reference(s.parse()?),
            Value::Object(_) => DensityFunctionJson::Data(Box::new(
                DensityFunctionData::deserialize(value)
                    .map_err(|e| DecodeError::malformed(CONTEXT, e))?,
            )),
            _ => {
                return Err(DecodeError::malformed(
                    CONTEXT,
                    "expected a number, a string or an object",
                ));
            }
        };
        lower(wire)
    }

    /// Encode the tree to its JSON form.
    ///
    /// Constants encode as bare numbers and references (baked or not) as their key.
    #[must_use]
    pub fn encode(&self) -> Value {
        // The wire model only has string map keys, so conversion cannot fail.
        serde_json::to_value(raise(self)).unwrap_or(Value::Null)
    }
}

impl Serialize for DensityFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        raise(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DensityFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(de::Error::custom)
    }
}

/// First object `"type"` anywhere in `value` that names no density function.
fn find_unknown_type(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("type") {
                let bare = name.strip_prefix("minecraft:").unwrap_or(name);
                if !KNOWN_TYPES.contains(&bare) {
                    return Some(name.clone());
                }
            }
            map.values().find_map(find_unknown_type)
        }
        Value::Array(items) => items.iter().find_map(find_unknown_type),
        _ => None,
    }
}

// ── Wire -> runtime ─────────────────────────────────────────────────────────

fn lower_arc(json: DensityFunctionJson) -> Result<Arc<DensityFunction>, DecodeError> {
    lower(json).map(Arc::new)
}

fn mapped(op: MappedType, argument: DensityFunctionJson) -> Result<DensityFunction, DecodeError> {
    Ok(DensityFunction::Mapped(Mapped {
        op,
        input: lower_arc(argument)?,
    }))
}

fn two_arg(
    op: TwoArgType,
    a: DensityFunctionJson,
    b: DensityFunctionJson,
) -> Result<DensityFunction, DecodeError> {
    Ok(DensityFunction::TwoArgumentSimple(TwoArgumentSimple {
        op,
        argument1: lower_arc(a)?,
        argument2: lower_arc(b)?,
    }))
}

fn marker(kind: MarkerType, argument: DensityFunctionJson) -> Result<DensityFunction, DecodeError> {
    Ok(DensityFunction::Marker(Marker {
        kind,
        wrapped: lower_arc(argument)?,
    }))
}

fn lower(json: DensityFunctionJson) -> Result<DensityFunction, DecodeError> {
    match json {
        DensityFunctionJson::Constant(v) => Ok(DensityFunction::constant(v)),
        DensityFunctionJson::Reference(id) => Ok(DensityFunction::reference(id)),
        DensityFunctionJson::Data(data) => lower_data(*data),
    }
}

fn lower_data(data: DensityFunctionData) -> Result<DensityFunction, DecodeError> {
    use DensityFunctionData as D;

    let df = match data {
        D::Constant { argument } => DensityFunction::constant(argument),
        D::YClampedGradient {
            from_y,
            to_y,
            from_value,
            to_value,
        } => DensityFunction::YClampedGradient(YClampedGradient {
            from_y,
            to_y,
            from_value,
            to_value,
        }),
        D::Noise {
            noise,
            xz_scale,
            y_scale,
        } => DensityFunction::noise(noise, xz_scale, y_scale),
        D::ShiftedNoise {
            shift_x,
            shift_y,
            shift_z,
            xz_scale,
            y_scale,
            noise,
        } => DensityFunction::ShiftedNoise(ShiftedNoise {
            shift_x: lower_arc(shift_x)?,
            shift_y: lower_arc(shift_y)?,
            shift_z: lower_arc(shift_z)?,
            xz_scale,
            y_scale,
            noise: NoiseHolder::new(noise),
        }),
        D::ShiftA { argument } => DensityFunction::ShiftA(ShiftA {
            noise: NoiseHolder::new(argument),
        }),
        D::ShiftB { argument } => DensityFunction::ShiftB(ShiftB {
            noise: NoiseHolder::new(argument),
        }),
        D::Shift { argument } => DensityFunction::Shift(Shift {
            noise: NoiseHolder::new(argument),
        }),
        D::Clamp { input, min, max } => DensityFunction::Clamp(Clamp {
            input: lower_arc(input)?,
            min,
            max,
        }),
        D::Abs { argument } => mapped(MappedType::Abs, argument)?,
        D::Square { argument } => mapped(MappedType::Square, argument)?,
        D::Cube { argument } => mapped(MappedType::Cube, argument)?,
        D::HalfNegative { argument } => mapped(MappedType::HalfNegative, argument)?,
        D::QuarterNegative { argument } => mapped(MappedType::QuarterNegative, argument)?,
        D::Invert { argument } => mapped(MappedType::Invert, argument)?,
        D::Squeeze { argument } => mapped(MappedType::Squeeze, argument)?,
        D::Add {
            argument1,
            argument2,
        } => two_arg(TwoArgType::Add, argument1, argument2)?,
        D::Mul {
            argument1,
            argument2,
        } => two_arg(TwoArgType::Mul, argument1, argument2)?,
        D::Min {
            argument1,
            argument2,
        } => two_arg(TwoArgType::Min, argument1, argument2)?,
        D::Max {
            argument1,
            argument2,
        } => two_arg(TwoArgType::Max, argument1, argument2)?,
        D::Spline { spline } => DensityFunction::Spline(Spline {
            spline: lower_spline(spline)?,
        }),
        D::RangeChoice {
            input,
            min_inclusive,
            max_exclusive,
            when_in_range,
            when_out_of_range,
        } => DensityFunction::RangeChoice(RangeChoice {
            input: lower_arc(input)?,
            min_inclusive,
            max_exclusive,
            when_in_range: lower_arc(when_in_range)?,
            when_out_of_range: lower_arc(when_out_of_range)?,
        }),
        D::Interpolated { argument } => marker(MarkerType::Interpolated, argument)?,
        D::FlatCache { argument } => marker(MarkerType::FlatCache, argument)?,
        D::CacheOnce { argument } => marker(MarkerType::CacheOnce, argument)?,
        D::Cache2d { argument } => marker(MarkerType::Cache2D, argument)?,
        D::CacheAllInCell { argument } => marker(MarkerType::CacheAllInCell, argument)?,
        D::BlendOffset {} => DensityFunction::BlendOffset,
        D::BlendAlpha {} => DensityFunction::BlendAlpha,
        D::BlendDensity { argument } => DensityFunction::BlendDensity(BlendDensity {
            input: lower_arc(argument)?,
        }),
        D::Beardifier {} => DensityFunction::Beardifier,
        D::EndIslands {} => DensityFunction::EndIslands(EndIslandsDensity::default()),
        D::WeirdScaledSampler {
            input,
            noise,
            rarity_value_mapper,
        } => DensityFunction::WeirdScaledSampler(WeirdScaledSampler {
            input: lower_arc(input)?,
            noise: NoiseHolder::new(noise),
            rarity_value_mapper,
        }),
        D::OldBlendedNoise(params) => {
            DensityFunction::OldBlendedNoise(OldBlendedNoise { params, noise: None })
        }
        D::FindTopSurface {
            density,
            upper_bound,
            lower_bound,
            cell_height,
        } => {
            if cell_height < 1 {
                return Err(DecodeError::malformed(
                    "find_top_surface",
                    format!("cell_height must be positive, got {cell_height}"),
                ));
            }
            DensityFunction::FindTopSurface(FindTopSurface {
                density: lower_arc(density)?,
                upper_bound: lower_arc(upper_bound)?,
                lower_bound,
                cell_height,
            })
        }
    };
    Ok(df)
}

fn lower_spline(json: SplineJson) -> Result<SplineValue, DecodeError> {
    match json {
        SplineJson::Constant(v) => Ok(SplineValue::Constant(v)),
        SplineJson::Multipoint { coordinate, points } => {
            let points = points
                .into_iter()
                .map(|p| {
                    Ok(SplinePoint {
                        location: p.location,
                        value: lower_spline(p.value)?,
                        derivative: p.derivative,
                    })
                })
                .collect::<Result<_, DecodeError>>()?;
            let coordinate = lower_arc(coordinate)?;
            Ok(SplineValue::Spline(Arc::new(CubicSpline::new(coordinate, points))))
        }
    }
}

// ── Runtime -> wire ─────────────────────────────────────────────────────────

fn raise(df: &DensityFunction) -> DensityFunctionJson {
    use DensityFunctionData as D;

    let data = match df {
        DensityFunction::Constant(c) => return DensityFunctionJson::Constant(c.value),
        DensityFunction::Reference(r) => return DensityFunctionJson::Reference(r.id.clone()),
        DensityFunction::YClampedGradient(g) => D::YClampedGradient {
            from_y: g.from_y,
            to_y: g.to_y,
            from_value: g.from_value,
            to_value: g.to_value,
        },
        DensityFunction::Noise(n) => D::Noise {
            noise: n.noise.id.clone(),
            xz_scale: n.xz_scale,
            y_scale: n.y_scale,
        },
        DensityFunction::ShiftedNoise(n) => D::ShiftedNoise {
            shift_x: raise(&n.shift_x),
            shift_y: raise(&n.shift_y),
            shift_z: raise(&n.shift_z),
            xz_scale: n.xz_scale,
            y_scale: n.y_scale,
            noise: n.noise.id.clone(),
        },
        DensityFunction::ShiftA(s) => D::ShiftA {
            argument: s.noise.id.clone(),
        },
        DensityFunction::ShiftB(s) => D::ShiftB {
            argument: s.noise.id.clone(),
        },
        DensityFunction::Shift(s) => D::Shift {
            argument: s.noise.id.clone(),
        },
        DensityFunction::TwoArgumentSimple(t) => {
            let argument1 = raise(&t.argument1);
            let argument2 = raise(&t.argument2);
            match t.op {
                TwoArgType::Add => D::Add {
                    argument1,
                    argument2,
                },
                TwoArgType::Mul => D::Mul {
                    argument1,
                    argument2,
                },
                TwoArgType::Min => D::Min {
                    argument1,
                    argument2,
                },
                TwoArgType::Max => D::Max {
                    argument1,
                    argument2,
                },
            }
        }
        DensityFunction::Mapped(m) => {
            let argument = raise(&m.input);
            match m.op {
                MappedType::Abs => D::Abs { argument },
                MappedType::Square => D::Square { argument },
                MappedType::Cube => D::Cube { argument },
                MappedType::HalfNegative => D::HalfNegative { argument },
                MappedType::QuarterNegative => D::QuarterNegative { argument },
                MappedType::Invert => D::Invert { argument },
                MappedType::Squeeze => D::Squeeze { argument },
            }
        }
        DensityFunction::Clamp(c) => D::Clamp {
            input: raise(&c.input),
            min: c.min,
            max: c.max,
        },
        DensityFunction::RangeChoice(r) => D::RangeChoice {
            input: raise(&r.input),
            min_inclusive: r.min_inclusive,
            max_exclusive: r.max_exclusive,
            when_in_range: raise(&r.when_in_range),
            when_out_of_range: raise(&r.when_out_of_range),
        },
        DensityFunction::Spline(s) => D::Spline {
            spline: raise_spline(&s.spline),
        },
        DensityFunction::OldBlendedNoise(b) => D::OldBlendedNoise(b.params),
        DensityFunction::WeirdScaledSampler(w) => D::WeirdScaledSampler {
            input: raise(&w.input),
            noise: w.noise.id.clone(),
            rarity_value_mapper: w.rarity_value_mapper,
        },
        DensityFunction::EndIslands(_) => D::EndIslands {},
        DensityFunction::FindTopSurface(f) => D::FindTopSurface {
            density: raise(&f.density),
            upper_bound: raise(&f.upper_bound),
            lower_bound: f.lower_bound,
            cell_height: f.cell_height,
        },
        DensityFunction::BlendAlpha => D::BlendAlpha {},
        DensityFunction::BlendOffset => D::BlendOffset {},
        DensityFunction::BlendDensity(b) => D::BlendDensity {
            argument: raise(&b.input),
        },
        DensityFunction::Beardifier => D::Beardifier {},
        DensityFunction::Marker(m) => {
            let argument = raise(&m.wrapped);
            match m.kind {
                MarkerType::Interpolated => D::Interpolated { argument },
                MarkerType::FlatCache => D::FlatCache { argument },
                MarkerType::Cache2D => D::Cache2d { argument },
                MarkerType::CacheOnce => D::CacheOnce { argument },
                MarkerType::CacheAllInCell => D::CacheAllInCell { argument },
            }
        }
    };
    DensityFunctionJson::Data(Box::new(data))
}

fn raise_spline(spline: &SplineValue) -> SplineJson {
    match spline {
        SplineValue::Constant(v) => SplineJson::Constant(*v),
        SplineValue::Spline(s) => SplineJson::Multipoint {
            coordinate: raise(&s.coordinate),
            points: s
                .points
                .iter()
                .map(|p| SplinePointJson {
                    location: p.location,
                    value: raise_spline(&p.value),
                    derivative: p.derivative,
                })
                .collect(),
        },
    }
}
