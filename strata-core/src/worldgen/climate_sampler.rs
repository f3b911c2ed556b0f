//! Climate sampler over the baked noise router.
//!
//! Evaluates the six climate entries of a router (temperature, vegetation,
//! continents, erosion, depth, ridges) to produce `TargetPoint` values for
//! biome lookup.

use strata_utils::climate::{TargetPoint, quantize_coord};
use strata_utils::density::{DensityFunction, FunctionContext, NoiseRouter};

/// The climate half of a baked noise router.
#[derive(Debug, Clone)]
pub struct ClimateSampler {
    temperature: DensityFunction,
    vegetation: DensityFunction,
    continents: DensityFunction,
    erosion: DensityFunction,
    depth: DensityFunction,
    ridges: DensityFunction,
}

impl ClimateSampler {
    /// Take the climate entries of `router`, which should already be baked.
    #[must_use]
    pub fn new(router: &NoiseRouter) -> Self {
        Self {
            temperature: router.temperature.clone(),
            vegetation: router.vegetation.clone(),
            continents: router.continents.clone(),
            erosion: router.erosion.clone(),
            depth: router.depth.clone(),
            ridges: router.ridges.clone(),
        }
    }

    /// Sample climate at a quart position.
    #[must_use]
    pub fn sample(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> TargetPoint {
        let ctx = FunctionContext::new(quart_x << 2, quart_y << 2, quart_z << 2);

        // quantize_coord narrows to f32 first, as vanilla does before quantizing.
        let sample = |df: &DensityFunction| quantize_coord(df.compute(&ctx));
        TargetPoint::new(
            sample(&self.temperature),
            sample(&self.vegetation),
            sample(&self.continents),
            sample(&self.erosion),
            sample(&self.depth),
            sample(&self.ridges),
        )
    }

    /// Erosion at a block position, unquantized.
    #[must_use]
    pub fn erosion(&self, block_x: i32, block_y: i32, block_z: i32) -> f64 {
        self.erosion
            .compute(&FunctionContext::new(block_x, block_y, block_z))
    }
}
