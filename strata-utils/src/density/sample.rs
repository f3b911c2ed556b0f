//! Per-position evaluation of density function trees.

use tracing::warn;

use crate::density::spline_eval::evaluate_spline;
use crate::density::types::{
    CubicSpline, DensityFunction, FindTopSurface, MappedType, NoiseHolder, SplineValue, TwoArgType,
};
use crate::math::{clamp, cube, floor, map_clamped, square};

/// A block position at which a density function is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FunctionContext {
    /// Block X.
    pub block_x: i32,
    /// Block Y.
    pub block_y: i32,
    /// Block Z.
    pub block_z: i32,
}

impl FunctionContext {
    /// A context at `(x, y, z)`.
    #[must_use]
    pub const fn new(block_x: i32, block_y: i32, block_z: i32) -> Self {
        Self {
            block_x,
            block_y,
            block_z,
        }
    }
}

impl DensityFunction {
    /// Evaluate at `ctx`.
    ///
    /// Unbaked references and seed-dependent samplers log a warning and
    /// contribute `0.0`.
    #[must_use]
    pub fn compute(&self, ctx: &FunctionContext) -> f64 {
        let x = f64::from(ctx.block_x);
        let y = f64::from(ctx.block_y);
        let z = f64::from(ctx.block_z);

        match self {
            Self::Constant(c) => c.value,
            Self::Reference(r) => match &r.resolved {
                Some(target) => target.compute(ctx),
                None => {
                    warn!(
                        reference = %r.id,
                        "sampling unbaked density function reference, returning 0.0"
                    );
                    0.0
                }
            },
            Self::YClampedGradient(g) => map_clamped(
                y,
                f64::from(g.from_y),
                f64::from(g.to_y),
                g.from_value,
                g.to_value,
            ),
            Self::Noise(n) => n.noise.get_value(x * n.xz_scale, y * n.y_scale, z * n.xz_scale),
            Self::ShiftedNoise(n) => {
                let sx = x * n.xz_scale + n.shift_x.compute(ctx);
                let sy = y * n.y_scale + n.shift_y.compute(ctx);
                let sz = z * n.xz_scale + n.shift_z.compute(ctx);
                n.noise.get_value(sx, sy, sz)
            }
            Self::ShiftA(s) => s.noise.shift(x, 0.0, z),
            Self::ShiftB(s) => s.noise.shift(z, x, 0.0),
            Self::Shift(s) => s.noise.shift(x, y, z),
            Self::TwoArgumentSimple(t) => {
                let a = t.argument1.compute(ctx);
                match t.op {
                    TwoArgType::Add => a + t.argument2.compute(ctx),
                    TwoArgType::Mul if a == 0.0 => 0.0,
                    TwoArgType::Mul => a * t.argument2.compute(ctx),
                    TwoArgType::Min => a.min(t.argument2.compute(ctx)),
                    TwoArgType::Max => a.max(t.argument2.compute(ctx)),
                }
            }
            Self::Mapped(m) => m.op.apply(m.input.compute(ctx)),
            Self::Clamp(c) => clamp(c.input.compute(ctx), c.min, c.max),
            Self::RangeChoice(r) => {
                let v = r.input.compute(ctx);
                if v >= r.min_inclusive && v < r.max_exclusive {
                    r.when_in_range.compute(ctx)
                } else {
                    r.when_out_of_range.compute(ctx)
                }
            }
            Self::Spline(s) => f64::from(s.spline.apply(ctx)),
            Self::OldBlendedNoise(b) => match &b.noise {
                Some(noise) => noise.compute(ctx.block_x, ctx.block_y, ctx.block_z),
                None => {
                    warn!("sampling unbaked old_blended_noise, returning 0.0");
                    0.0
                }
            },
            Self::WeirdScaledSampler(w) => {
                let e = w.rarity_value_mapper.get_values(w.input.compute(ctx));
                e * w.noise.get_value(x / e, y / e, z / e).abs()
            }
            Self::EndIslands(e) => match &e.islands {
                Some(islands) => islands.sample(ctx.block_x, ctx.block_z),
                None => {
                    warn!("sampling unbaked end_islands, returning 0.0");
                    0.0
                }
            },
            Self::FindTopSurface(f) => f.scan(ctx),
            Self::BlendAlpha => 1.0,
            Self::BlendOffset | Self::Beardifier => 0.0,
            Self::BlendDensity(b) => b.input.compute(ctx),
            Self::Marker(m) => m.wrapped.compute(ctx),
        }
    }
}

impl MappedType {
    /// Apply the mapping to `v`.
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Abs => v.abs(),
            Self::Square => square(v),
            Self::Cube => cube(v),
            Self::HalfNegative => {
                if v > 0.0 {
                    v
                } else {
                    v * 0.5
                }
            }
            Self::QuarterNegative => {
                if v > 0.0 {
                    v
                } else {
                    v * 0.25
                }
            }
            Self::Invert => 1.0 / v,
            Self::Squeeze => {
                let c = clamp(v, -1.0, 1.0);
                c / 2.0 - c * c * c / 24.0
            }
        }
    }
}

impl NoiseHolder {
    /// Sample the baked noise, or warn and return `0.0` when unbaked.
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        match &self.noise {
            Some(noise) => noise.get_value(x, y, z),
            None => {
                warn!(noise = %self.id, "sampling unbaked noise, returning 0.0");
                0.0
            }
        }
    }

    fn shift(&self, x: f64, y: f64, z: f64) -> f64 {
        self.get_value(x * 0.25, y * 0.25, z * 0.25) * 4.0
    }
}

impl SplineValue {
    /// Evaluate at `ctx` in `f32`.
    #[must_use]
    pub fn apply(&self, ctx: &FunctionContext) -> f32 {
        match self {
            Self::Constant(v) => *v,
            Self::Spline(spline) => spline.apply(ctx),
        }
    }
}

impl CubicSpline {
    /// Evaluate at `ctx`: the coordinate is narrowed to `f32` before the interval
    /// search.
    #[must_use]
    pub fn apply(&self, ctx: &FunctionContext) -> f32 {
        let input = self.coordinate.compute(ctx) as f32;
        evaluate_spline(&self.locations, &self.derivatives, input, |i| {
            self.points[i].value.apply(ctx)
        })
    }
}

impl FindTopSurface {
    fn scan(&self, ctx: &FunctionContext) -> f64 {
        let cell = self.cell_height;
        if cell < 1 {
            return f64::from(self.lower_bound);
        }
        let top = floor(self.upper_bound.compute(ctx) / f64::from(cell)).wrapping_mul(cell);
        if top <= self.lower_bound {
            return f64::from(self.lower_bound);
        }

        let mut y = top;
        while y >= self.lower_bound {
            let at_y = FunctionContext::new(ctx.block_x, y, ctx.block_z);
            if self.density.compute(&at_y) > 0.0 {
                return f64::from(y);
            }
            let Some(next) = y.checked_sub(cell) else {
                break;
            };
            y = next;
        }
        f64::from(self.lower_bound)
    }
}
