//! Baking: resolving references and instantiating seed-dependent samplers.

use std::sync::Arc;

use crate::density::end_islands::EndIslands;
use crate::density::error::BakeError;
use crate::density::types::{
    BlendDensity, Clamp, CubicSpline, DensityFunction, EndIslandsDensity, FindTopSurface, Mapped,
    Marker, Noise, NoiseHolder, OldBlendedNoise, RangeChoice, Reference, Shift, ShiftA, ShiftB,
    ShiftedNoise, Spline, SplinePoint, SplineValue, TwoArgumentSimple, WeirdScaledSampler,
};
use crate::identifier::Identifier;
use crate::noise::{BlendedNoise, BlendedNoiseParams, NormalNoise};

/// Supplies baked targets and samplers while a tree is baked.
///
/// Implementations own the registry view and the world seed; the tree walk
/// itself lives in [`DensityFunction::bake`].
pub trait DensityBaker {
    /// The baked function registered under `id`.
    fn resolve_reference(&mut self, id: &Identifier) -> Result<Arc<DensityFunction>, BakeError>;

    /// The instantiated noise registered under `id`.
    fn noise(&mut self, id: &Identifier) -> Result<Arc<NormalNoise>, BakeError>;

    /// A legacy blended noise built from `params`.
    fn blended_noise(
        &mut self,
        params: &BlendedNoiseParams,
    ) -> Result<Arc<BlendedNoise>, BakeError>;

    /// The End island sampler.
    fn end_islands(&mut self) -> Result<Arc<EndIslands>, BakeError>;
}

impl DensityFunction {
    /// Produce a self-contained copy of this tree with every reference resolved
    /// and every sampler instantiated.
    ///
    /// Parts that are already baked are kept, so baking a baked tree again
    /// returns an equivalent tree without asking `baker` for anything.
    pub fn bake<B: DensityBaker + ?Sized>(&self, baker: &mut B) -> Result<Self, BakeError> {
        Ok(match self {
            Self::Constant(_)
            | Self::YClampedGradient(_)
            | Self::BlendAlpha
            | Self::BlendOffset
            | Self::Beardifier => self.clone(),
            Self::Reference(r) => {
                let resolved = match &r.resolved {
                    Some(target) => target.clone(),
                    None => baker.resolve_reference(&r.id)?,
                };
                Self::Reference(Reference {
                    id: r.id.clone(),
                    resolved: Some(resolved),
                })
            }
            Self::Noise(n) => Self::Noise(Noise {
                noise: n.noise.bake(baker)?,
                xz_scale: n.xz_scale,
                y_scale: n.y_scale,
            }),
            Self::ShiftedNoise(n) => Self::ShiftedNoise(ShiftedNoise {
                shift_x: bake_arc(&n.shift_x, baker)?,
                shift_y: bake_arc(&n.shift_y, baker)?,
                shift_z: bake_arc(&n.shift_z, baker)?,
                xz_scale: n.xz_scale,
                y_scale: n.y_scale,
                noise: n.noise.bake(baker)?,
            }),
            Self::ShiftA(s) => Self::ShiftA(ShiftA {
                noise: s.noise.bake(baker)?,
            }),
            Self::ShiftB(s) => Self::ShiftB(ShiftB {
                noise: s.noise.bake(baker)?,
            }),
            Self::Shift(s) => Self::Shift(Shift {
                noise: s.noise.bake(baker)?,
            }),
            Self::TwoArgumentSimple(t) => Self::TwoArgumentSimple(TwoArgumentSimple {
                op: t.op,
                argument1: bake_arc(&t.argument1, baker)?,
                argument2: bake_arc(&t.argument2, baker)?,
            }),
            Self::Mapped(m) => Self::Mapped(Mapped {
                op: m.op,
                input: bake_arc(&m.input, baker)?,
            }),
            Self::Clamp(c) => Self::Clamp(Clamp {
                input: bake_arc(&c.input, baker)?,
                min: c.min,
                max: c.max,
            }),
            Self::RangeChoice(r) => Self::RangeChoice(RangeChoice {
                input: bake_arc(&r.input, baker)?,
                min_inclusive: r.min_inclusive,
                max_exclusive: r.max_exclusive,
                when_in_range: bake_arc(&r.when_in_range, baker)?,
                when_out_of_range: bake_arc(&r.when_out_of_range, baker)?,
            }),
            Self::Spline(s) => Self::Spline(Spline {
                spline: s.spline.bake(baker)?,
            }),
            Self::OldBlendedNoise(b) => {
                let noise = match &b.noise {
                    Some(noise) => noise.clone(),
                    None => baker.blended_noise(&b.params)?,
                };
                Self::OldBlendedNoise(OldBlendedNoise {
                    params: b.params,
                    noise: Some(noise),
                })
            }
            Self::WeirdScaledSampler(w) => Self::WeirdScaledSampler(WeirdScaledSampler {
                input: bake_arc(&w.input, baker)?,
                noise: w.noise.bake(baker)?,
                rarity_value_mapper: w.rarity_value_mapper,
            }),
            Self::EndIslands(e) => {
                let islands = match &e.islands {
                    Some(islands) => islands.clone(),
                    None => baker.end_islands()?,
                };
                Self::EndIslands(EndIslandsDensity {
                    islands: Some(islands),
                })
            }
            Self::FindTopSurface(f) => Self::FindTopSurface(FindTopSurface {
                density: bake_arc(&f.density, baker)?,
                upper_bound: bake_arc(&f.upper_bound, baker)?,
                lower_bound: f.lower_bound,
                cell_height: f.cell_height,
            }),
            Self::BlendDensity(b) => Self::BlendDensity(BlendDensity {
                input: bake_arc(&b.input, baker)?,
            }),
            Self::Marker(m) => Self::Marker(Marker {
                kind: m.kind,
                wrapped: bake_arc(&m.wrapped, baker)?,
            }),
        })
    }

    /// Report the first placeholder left unbaked in this tree.
    ///
    /// Resolved references are not descended into; their targets were
    /// validated when they were baked.
    pub fn validate_baked(&self) -> Result<(), BakeError> {
        match self {
            Self::Constant(_)
            | Self::YClampedGradient(_)
            | Self::BlendAlpha
            | Self::BlendOffset
            | Self::Beardifier => Ok(()),
            Self::Reference(r) => match r.resolved {
                Some(_) => Ok(()),
                None => Err(BakeError::MissingReference(r.id.clone())),
            },
            Self::Noise(n) => n.noise.validate_baked(),
            Self::ShiftedNoise(n) => {
                n.shift_x.validate_baked()?;
                n.shift_y.validate_baked()?;
                n.shift_z.validate_baked()?;
                n.noise.validate_baked()
            }
            Self::ShiftA(ShiftA { noise })
            | Self::ShiftB(ShiftB { noise })
            | Self::Shift(Shift { noise }) => noise.validate_baked(),
            Self::TwoArgumentSimple(t) => {
                t.argument1.validate_baked()?;
                t.argument2.validate_baked()
            }
            Self::Mapped(Mapped { input, .. })
            | Self::Clamp(Clamp { input, .. })
            | Self::BlendDensity(BlendDensity { input })
            | Self::Marker(Marker { wrapped: input, .. }) => input.validate_baked(),
            Self::RangeChoice(r) => {
                r.input.validate_baked()?;
                r.when_in_range.validate_baked()?;
                r.when_out_of_range.validate_baked()
            }
            Self::Spline(s) => s.spline.validate_baked(),
            Self::OldBlendedNoise(b) => match b.noise {
                Some(_) => Ok(()),
                None => Err(BakeError::NoSeedSet(Identifier::vanilla_static(
                    "old_blended_noise",
                ))),
            },
            Self::WeirdScaledSampler(w) => {
                w.input.validate_baked()?;
                w.noise.validate_baked()
            }
            Self::EndIslands(e) => match e.islands {
                Some(_) => Ok(()),
                None => Err(BakeError::NoSeedSet(Identifier::vanilla_static("end_islands"))),
            },
            Self::FindTopSurface(f) => {
                f.density.validate_baked()?;
                f.upper_bound.validate_baked()
            }
        }
    }
}

fn bake_arc<B: DensityBaker + ?Sized>(
    df: &Arc<DensityFunction>,
    baker: &mut B,
) -> Result<Arc<DensityFunction>, BakeError> {
    df.bake(baker).map(Arc::new)
}

impl NoiseHolder {
    fn bake<B: DensityBaker + ?Sized>(&self, baker: &mut B) -> Result<Self, BakeError> {
        let noise = match &self.noise {
            Some(noise) => noise.clone(),
            None => baker.noise(&self.id)?,
        };
        Ok(Self {
            id: self.id.clone(),
            noise: Some(noise),
        })
    }

    fn validate_baked(&self) -> Result<(), BakeError> {
        match self.noise {
            Some(_) => Ok(()),
            None => Err(BakeError::NoSeedSet(self.id.clone())),
        }
    }
}

impl SplineValue {
    fn bake<B: DensityBaker + ?Sized>(&self, baker: &mut B) -> Result<Self, BakeError> {
        match self {
            Self::Constant(_) => Ok(self.clone()),
            Self::Spline(spline) => {
                let points = spline
                    .points
                    .iter()
                    .map(|p| {
                        Ok(SplinePoint {
                            location: p.location,
                            value: p.value.bake(baker)?,
                            derivative: p.derivative,
                        })
                    })
                    .collect::<Result<Vec<_>, BakeError>>()?;
                let coordinate = bake_arc(&spline.coordinate, baker)?;
                Ok(Self::Spline(Arc::new(CubicSpline::new(coordinate, points))))
            }
        }
    }

    fn validate_baked(&self) -> Result<(), BakeError> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Spline(spline) => {
                spline.coordinate.validate_baked()?;
                spline
                    .points
                    .iter()
                    .try_for_each(|p| p.value.validate_baked())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;
    use serde_json::json;

    use super::*;
    use crate::density::sample::FunctionContext;
    use crate::noise::NoiseParameters;
    use crate::random::xoroshiro::Xoroshiro;

    /// Resolves references from a map of unbaked functions and counts every request.
    #[derive(Default)]
    struct CountingBaker {
        functions: FxHashMap<Identifier, DensityFunction>,
        references: usize,
        noises: usize,
    }

    impl DensityBaker for CountingBaker {
        fn resolve_reference(
            &mut self,
            id: &Identifier,
        ) -> Result<Arc<DensityFunction>, BakeError> {
            self.references += 1;
            let target = self
                .functions
                .get(id)
                .cloned()
                .ok_or_else(|| BakeError::MissingReference(id.clone()))?;
            target.bake(self).map(Arc::new)
        }

        fn noise(&mut self, _id: &Identifier) -> Result<Arc<NormalNoise>, BakeError> {
            self.noises += 1;
            let mut random = Xoroshiro::from_seed(7);
            Ok(Arc::new(NormalNoise::create(
                &mut random,
                &NoiseParameters::new(-3, vec![1.0, 1.0]),
            )))
        }

        fn blended_noise(
            &mut self,
            _params: &BlendedNoiseParams,
        ) -> Result<Arc<BlendedNoise>, BakeError> {
            Err(BakeError::NoSeedSet(Identifier::vanilla_static("old_blended_noise")))
        }

        fn end_islands(&mut self) -> Result<Arc<EndIslands>, BakeError> {
            Ok(Arc::new(EndIslands::new(0)))
        }
    }

    fn decode(value: &serde_json::Value) -> DensityFunction {
        DensityFunction::decode(value).expect("decodable")
    }

    #[test]
    fn bake_resolves_references_and_noises() {
        let mut baker = CountingBaker::default();
        baker.functions.insert(
            Identifier::vanilla_static("two"),
            decode(&json!({"type": "minecraft:add", "argument1": 1.0, "argument2": 1.0})),
        );
        let root = decode(&json!({
            "type": "minecraft:add",
            "argument1": "two",
            "argument2": {"type": "minecraft:noise", "noise": "minecraft:ridge", "xz_scale": 1.0, "y_scale": 1.0}
        }));
        assert!(matches!(
            root.validate_baked(),
            Err(BakeError::MissingReference(_))
        ));

        let baked = root.bake(&mut baker).expect("bakes");
        baked.validate_baked().expect("fully baked");
        assert_eq!((baker.references, baker.noises), (1, 1));
        assert_eq!(baked.encode(), root.encode());

        let ctx = FunctionContext::new(10, 20, 30);
        let noise_only = decode(&json!({"type": "minecraft:noise", "noise": "minecraft:ridge", "xz_scale": 1.0, "y_scale": 1.0}))
            .bake(&mut baker)
            .expect("bakes");
        let expected = 2.0 + noise_only.compute(&ctx);
        assert!((baked.compute(&ctx) - expected).abs() < 1e-12);
    }

    #[test]
    fn bake_is_idempotent() {
        let mut baker = CountingBaker::default();
        baker
            .functions
            .insert(Identifier::vanilla_static("c"), DensityFunction::constant(4.0));
        let root = decode(&json!({"type": "minecraft:mul", "argument1": "c", "argument2": {"type": "minecraft:end_islands"}}));
        let once = root.bake(&mut baker).expect("bakes");
        let requests = baker.references;

        let twice = once.bake(&mut baker).expect("bakes again");
        assert_eq!(baker.references, requests);
        let ctx = FunctionContext::new(0, 0, 0);
        assert!((once.compute(&ctx) - twice.compute(&ctx)).abs() < f64::EPSILON);
        assert!((twice.compute(&ctx) - 4.0 * 0.5625).abs() < 1e-12);
    }

    #[test]
    fn missing_reference_fails() {
        let mut baker = CountingBaker::default();
        let root = decode(&json!({"type": "minecraft:abs", "argument": "nowhere"}));
        assert_eq!(
            root.bake(&mut baker).err(),
            Some(BakeError::MissingReference(Identifier::vanilla_static("nowhere")))
        );
    }

    #[test]
    fn validate_reports_unbaked_noise() {
        let root = decode(&json!({"type": "minecraft:shift_a", "argument": "minecraft:offset"}));
        assert_eq!(
            root.validate_baked(),
            Err(BakeError::NoSeedSet(Identifier::vanilla_static("offset")))
        );
    }
}
