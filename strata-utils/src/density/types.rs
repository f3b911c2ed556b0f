//! Density function node types matching vanilla's `DensityFunctions`.
//!
//! Each node type is its own struct, mirroring vanilla's per-type records, and the
//! [`DensityFunction`] enum wraps them for dispatch. Nodes that depend on world
//! seed material (references, noises, blended noise, End islands) hold an `Option`
//! that stays `None` until the tree is baked.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::density::end_islands::EndIslands;
use crate::identifier::Identifier;
use crate::noise::{BlendedNoise, BlendedNoiseParams, NormalNoise};

// ── Individual density function structs ──────────────────────────────────────

/// A constant density value.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    /// The constant value.
    pub value: f64,
}

/// A reference to another density function by key.
///
/// Baking stores the baked target in `resolved`. Matches vanilla's `HolderHolder`.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Registry key of the target.
    pub id: Identifier,
    /// Baked target.
    pub resolved: Option<Arc<DensityFunction>>,
}

/// `from_value` at `from_y`, `to_value` at `to_y`, linear between, clamped outside.
#[derive(Debug, Clone, Copy)]
pub struct YClampedGradient {
    /// Lower Y anchor.
    pub from_y: i32,
    /// Upper Y anchor.
    pub to_y: i32,
    /// Value at `from_y`.
    pub from_value: f64,
    /// Value at `to_y`.
    pub to_value: f64,
}

/// A noise key together with its baked sampler.
#[derive(Debug, Clone)]
pub struct NoiseHolder {
    /// Registry key of the noise definition.
    pub id: Identifier,
    /// Baked sampler.
    pub noise: Option<Arc<NormalNoise>>,
}

impl NoiseHolder {
    /// An unbaked holder for `id`.
    #[must_use]
    pub const fn new(id: Identifier) -> Self {
        Self { id, noise: None }
    }
}

/// Sample a noise at `(x * xz_scale, y * y_scale, z * xz_scale)`.
#[derive(Debug, Clone)]
pub struct Noise {
    /// The noise sampled.
    pub noise: NoiseHolder,
    /// Horizontal scale.
    pub xz_scale: f64,
    /// Vertical scale.
    pub y_scale: f64,
}

/// Sample a noise at scaled coordinates displaced by three shift functions.
#[derive(Debug, Clone)]
pub struct ShiftedNoise {
    /// X displacement.
    pub shift_x: Arc<DensityFunction>,
    /// Y displacement.
    pub shift_y: Arc<DensityFunction>,
    /// Z displacement.
    pub shift_z: Arc<DensityFunction>,
    /// Horizontal scale.
    pub xz_scale: f64,
    /// Vertical scale.
    pub y_scale: f64,
    /// The noise sampled.
    pub noise: NoiseHolder,
}

/// Coordinate shift sampled at `(x, 0, z)`.
#[derive(Debug, Clone)]
pub struct ShiftA {
    /// The offset noise.
    pub noise: NoiseHolder,
}

/// Coordinate shift sampled at `(z, x, 0)`.
#[derive(Debug, Clone)]
pub struct ShiftB {
    /// The offset noise.
    pub noise: NoiseHolder,
}

/// Coordinate shift sampled at `(x, y, z)`.
#[derive(Debug, Clone)]
pub struct Shift {
    /// The offset noise.
    pub noise: NoiseHolder,
}

/// The type of two-argument operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoArgType {
    /// `a + b`.
    Add,
    /// `a * b`, skipping `b` when `a == 0`.
    Mul,
    /// `min(a, b)`.
    Min,
    /// `max(a, b)`.
    Max,
}

/// A two-argument density function.
#[derive(Debug, Clone)]
pub struct TwoArgumentSimple {
    /// The operation.
    pub op: TwoArgType,
    /// First argument.
    pub argument1: Arc<DensityFunction>,
    /// Second argument.
    pub argument2: Arc<DensityFunction>,
}

/// The type of unary mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedType {
    /// `|v|`.
    Abs,
    /// `v * v`.
    Square,
    /// `v * v * v`.
    Cube,
    /// `v` when positive, else `v * 0.5`.
    HalfNegative,
    /// `v` when positive, else `v * 0.25`.
    QuarterNegative,
    /// `1 / v`.
    Invert,
    /// Clamp to `[-1, 1]`, then `c/2 - c^3/24`.
    Squeeze,
}

/// A unary mapping of its input.
#[derive(Debug, Clone)]
pub struct Mapped {
    /// The mapping.
    pub op: MappedType,
    /// Input.
    pub input: Arc<DensityFunction>,
}

/// Clamp the input to `[min, max]`.
#[derive(Debug, Clone)]
pub struct Clamp {
    /// Input.
    pub input: Arc<DensityFunction>,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Route to one of two branches by whether the input lies in
/// `[min_inclusive, max_exclusive)`.
#[derive(Debug, Clone)]
pub struct RangeChoice {
    /// Value tested.
    pub input: Arc<DensityFunction>,
    /// Inclusive lower bound.
    pub min_inclusive: f64,
    /// Exclusive upper bound.
    pub max_exclusive: f64,
    /// Branch when in range.
    pub when_in_range: Arc<DensityFunction>,
    /// Branch when out of range.
    pub when_out_of_range: Arc<DensityFunction>,
}

/// Legacy interpolated terrain noise.
#[derive(Debug, Clone)]
pub struct OldBlendedNoise {
    /// Configuration.
    pub params: BlendedNoiseParams,
    /// Baked sampler.
    pub noise: Option<Arc<BlendedNoise>>,
}

/// Cave sampler: `e * |noise(x / e, y / e, z / e)|` with `e` chosen by rarity.
#[derive(Debug, Clone)]
pub struct WeirdScaledSampler {
    /// Rarity input.
    pub input: Arc<DensityFunction>,
    /// The noise sampled.
    pub noise: NoiseHolder,
    /// Rarity to scale mapping.
    pub rarity_value_mapper: RarityValueMapper,
}

/// The End island field.
#[derive(Debug, Clone, Default)]
pub struct EndIslandsDensity {
    /// Baked sampler.
    pub islands: Option<Arc<EndIslands>>,
}

/// Highest Y in `[lower_bound, upper_bound]`, stepping by `cell_height`, where
/// `density` is positive.
#[derive(Debug, Clone)]
pub struct FindTopSurface {
    /// Function sampled down the column.
    pub density: Arc<DensityFunction>,
    /// Starting height (rounded down to a cell boundary).
    pub upper_bound: Arc<DensityFunction>,
    /// Lowest height returned.
    pub lower_bound: i32,
    /// Step between sampled heights.
    pub cell_height: i32,
}

/// Passthrough for chunk blending.
#[derive(Debug, Clone)]
pub struct BlendDensity {
    /// Input.
    pub input: Arc<DensityFunction>,
}

/// Marker kinds; evaluation is a passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerType {
    /// `interpolated`.
    Interpolated,
    /// `flat_cache`.
    FlatCache,
    /// `cache_2d`.
    Cache2D,
    /// `cache_once`.
    CacheOnce,
    /// `cache_all_in_cell`.
    CacheAllInCell,
}

/// A cache/interpolation marker around another function.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Marker kind.
    pub kind: MarkerType,
    /// Wrapped function.
    pub wrapped: Arc<DensityFunction>,
}

/// Spline-valued density function.
#[derive(Debug, Clone)]
pub struct Spline {
    /// The spline (possibly a bare constant).
    pub spline: SplineValue,
}

// ── DensityFunction enum (dispatch wrapper) ─────────────────────────────────

/// A node of the density function graph.
#[derive(Debug, Clone)]
pub enum DensityFunction {
    /// A constant value.
    Constant(Constant),
    /// A reference to another function by key.
    Reference(Reference),
    /// A Y-axis clamped gradient.
    YClampedGradient(YClampedGradient),
    /// Sample a noise.
    Noise(Noise),
    /// Sample a noise at shifted coordinates.
    ShiftedNoise(ShiftedNoise),
    /// Offset noise at `(x, 0, z)`.
    ShiftA(ShiftA),
    /// Offset noise at `(z, x, 0)`.
    ShiftB(ShiftB),
    /// Offset noise at `(x, y, z)`.
    Shift(Shift),
    /// `add`, `mul`, `min`, `max`.
    TwoArgumentSimple(TwoArgumentSimple),
    /// Unary mappings.
    Mapped(Mapped),
    /// Clamp to a range.
    Clamp(Clamp),
    /// Half-open range test.
    RangeChoice(RangeChoice),
    /// Cubic spline.
    Spline(Spline),
    /// Legacy interpolated noise.
    OldBlendedNoise(OldBlendedNoise),
    /// Rarity-scaled cave noise.
    WeirdScaledSampler(WeirdScaledSampler),
    /// End island field.
    EndIslands(EndIslandsDensity),
    /// Downward surface scan.
    FindTopSurface(FindTopSurface),
    /// Always `1.0`.
    BlendAlpha,
    /// Always `0.0`.
    BlendOffset,
    /// Passthrough.
    BlendDensity(BlendDensity),
    /// Always `0.0` (structure terrain adaptation is not modelled).
    Beardifier,
    /// Cache/interpolation marker (passthrough).
    Marker(Marker),
}

// ── Convenience constructors ────────────────────────────────────────────────

impl DensityFunction {
    /// A constant node.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Constant(Constant { value })
    }

    /// An unresolved reference.
    #[must_use]
    pub const fn reference(id: Identifier) -> Self {
        Self::Reference(Reference { id, resolved: None })
    }

    /// An unbaked noise sampler.
    #[must_use]
    pub const fn noise(id: Identifier, xz_scale: f64, y_scale: f64) -> Self {
        Self::Noise(Noise {
            noise: NoiseHolder::new(id),
            xz_scale,
            y_scale,
        })
    }

    /// A unary mapping.
    #[must_use]
    pub fn mapped(op: MappedType, input: Self) -> Self {
        Self::Mapped(Mapped {
            op,
            input: Arc::new(input),
        })
    }

    /// A binary operation.
    #[must_use]
    pub fn two_arg(op: TwoArgType, argument1: Self, argument2: Self) -> Self {
        Self::TwoArgumentSimple(TwoArgumentSimple {
            op,
            argument1: Arc::new(argument1),
            argument2: Arc::new(argument2),
        })
    }

    /// A half-open range choice.
    #[must_use]
    pub fn range_choice(
        input: Self,
        min_inclusive: f64,
        max_exclusive: f64,
        when_in_range: Self,
        when_out_of_range: Self,
    ) -> Self {
        Self::RangeChoice(RangeChoice {
            input: Arc::new(input),
            min_inclusive,
            max_exclusive,
            when_in_range: Arc::new(when_in_range),
            when_out_of_range: Arc::new(when_out_of_range),
        })
    }
}

// ── Supporting types ────────────────────────────────────────────────────────

/// Rarity mapping for [`WeirdScaledSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RarityValueMapper {
    /// `"type_1"`, spaghetti tunnels.
    #[serde(rename = "type_1")]
    Tunnels,
    /// `"type_2"`, spaghetti caves.
    #[serde(rename = "type_2")]
    Caves,
}

impl RarityValueMapper {
    /// Scale factor for a rarity value (vanilla `QuantizedSpaghettiRarity`).
    #[must_use]
    pub fn get_values(self, rarity: f64) -> f64 {
        match self {
            Self::Tunnels => {
                if rarity < -0.5 {
                    0.75
                } else if rarity < 0.0 {
                    1.0
                } else if rarity < 0.5 {
                    1.5
                } else {
                    2.0
                }
            }
            Self::Caves => {
                if rarity < -0.75 {
                    0.5
                } else if rarity < -0.5 {
                    0.75
                } else if rarity < 0.5 {
                    1.0
                } else if rarity < 0.75 {
                    2.0
                } else {
                    3.0
                }
            }
        }
    }
}

/// A multipoint cubic spline over a density function coordinate.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Function whose value (as `f32`) selects the interval.
    pub coordinate: Arc<DensityFunction>,
    /// Control points, sorted by location.
    pub points: Vec<SplinePoint>,
    /// Point locations, pre-extracted for the interval search.
    pub locations: SmallVec<[f32; 8]>,
    /// Point derivatives, pre-extracted.
    pub derivatives: SmallVec<[f32; 8]>,
}

impl CubicSpline {
    /// Build a spline, extracting the location and derivative arrays.
    #[must_use]
    pub fn new(coordinate: Arc<DensityFunction>, points: Vec<SplinePoint>) -> Self {
        let locations = points.iter().map(|p| p.location).collect();
        let derivatives = points.iter().map(|p| p.derivative).collect();
        Self {
            coordinate,
            points,
            locations,
            derivatives,
        }
    }
}

/// A control point.
#[derive(Debug, Clone)]
pub struct SplinePoint {
    /// Input location.
    pub location: f32,
    /// Output at this location.
    pub value: SplineValue,
    /// Slope at this location.
    pub derivative: f32,
}

/// A spline value: a constant or a nested spline.
#[derive(Debug, Clone)]
pub enum SplineValue {
    /// A constant.
    Constant(f32),
    /// A nested multipoint spline.
    Spline(Arc<CubicSpline>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tunnels_rarity_steps() {
        let mapper = RarityValueMapper::Tunnels;
        assert!((mapper.get_values(-0.6) - 0.75).abs() < f64::EPSILON);
        assert!((mapper.get_values(-0.3) - 1.0).abs() < f64::EPSILON);
        assert!((mapper.get_values(0.0) - 1.5).abs() < f64::EPSILON);
        assert!((mapper.get_values(0.6) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn caves_rarity_steps() {
        let mapper = RarityValueMapper::Caves;
        assert!((mapper.get_values(-0.8) - 0.5).abs() < f64::EPSILON);
        assert!((mapper.get_values(-0.6) - 0.75).abs() < f64::EPSILON);
        assert!((mapper.get_values(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((mapper.get_values(0.6) - 2.0).abs() < f64::EPSILON);
        assert!((mapper.get_values(0.8) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn spline_extracts_point_arrays() {
        let spline = CubicSpline::new(
            Arc::new(DensityFunction::constant(0.0)),
            vec![
                SplinePoint {
                    location: -1.0,
                    value: SplineValue::Constant(0.5),
                    derivative: 0.25,
                },
                SplinePoint {
                    location: 1.0,
                    value: SplineValue::Constant(-0.5),
                    derivative: 0.0,
                },
            ],
        );
        assert_eq!(spline.locations.as_slice(), [-1.0, 1.0]);
        assert_eq!(spline.derivatives.as_slice(), [0.25, 0.0]);
    }
}
