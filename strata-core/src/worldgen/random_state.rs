//! Seed-dependent generator state, matching vanilla's `RandomState`.

use rayon::prelude::*;
use strata_registry::WorldgenRegistries;
use strata_utils::Identifier;
use strata_utils::density::{DensityFunction, FunctionContext, NoiseRouter};
use strata_utils::random::RandomKind;
use tracing::debug;

use super::{
    BakeCoordinator, BakedRegistries, ClimateSampler, EndBiomeSource, MultiNoiseBiomeSource,
    NoiseSettings, WorldgenError,
};

/// Everything one seed needs to sample terrain and biomes.
///
/// Built once by [`RandomState::new`]; read-only afterwards and safe to share
/// between sampling threads.
#[derive(Debug, Clone)]
pub struct RandomState {
    seed: u64,
    kind: RandomKind,
    router: NoiseRouter,
    baked: BakedRegistries,
    climate: ClimateSampler,
}

impl RandomState {
    /// Run the baking pass for `seed`, then bake and validate the settings' router.
    ///
    /// # Errors
    /// Any noise, bake or registry failure, or a router entry left unbaked.
    pub fn new(
        seed: u64,
        settings: &NoiseSettings,
        registries: &WorldgenRegistries,
    ) -> Result<Self, WorldgenError> {
        let kind = settings.random_kind();
        let mut coordinator = BakeCoordinator::new(
            seed,
            kind,
            &registries.density_functions,
            &registries.noises,
        )?;
        coordinator.bake_registry()?;

        let router = settings.noise_router.bake(&mut coordinator)?;
        router.validate_baked()?;
        let baked = coordinator.finish()?;
        let climate = ClimateSampler::new(&router);

        debug!(
            seed,
            ?kind,
            functions = baked.density_functions.len(),
            noises = baked.noises.len(),
            "random state ready"
        );
        Ok(Self {
            seed,
            kind,
            router,
            baked,
            climate,
        })
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The generator family in use.
    #[must_use]
    pub const fn random_kind(&self) -> RandomKind {
        self.kind
    }

    /// The baked noise router.
    #[must_use]
    pub const fn router(&self) -> &NoiseRouter {
        &self.router
    }

    /// Baked registry contents.
    #[must_use]
    pub const fn baked(&self) -> &BakedRegistries {
        &self.baked
    }

    /// Climate sampler over the router.
    #[must_use]
    pub const fn climate_sampler(&self) -> &ClimateSampler {
        &self.climate
    }

    /// Sample `df` at `pos`.
    #[must_use]
    #[expect(clippy::unused_self, reason = "sampling is exposed on the state that owns the trees")]
    pub fn sample(&self, df: &DensityFunction, pos: FunctionContext) -> f64 {
        df.compute(&pos)
    }

    /// Sample the baked root registered under `key`, if there is one.
    #[must_use]
    pub fn sample_key(&self, key: &Identifier, pos: FunctionContext) -> Option<f64> {
        self.baked
            .density_functions
            .get(key)
            .map(|df| df.compute(&pos))
    }

    /// An End biome source for this seed.
    #[must_use]
    pub fn end_biome_source(&self) -> EndBiomeSource {
        EndBiomeSource::new(self.seed)
    }

    /// Look up biomes for many quart positions in parallel.
    ///
    /// Each worker keeps its own warm-start hint. Output order matches
    /// `positions`.
    #[must_use]
    pub fn sample_biomes(
        &self,
        source: &MultiNoiseBiomeSource,
        positions: &[(i32, i32, i32)],
    ) -> Vec<Identifier> {
        positions
            .par_iter()
            .map_init(
                || None,
                |hint, &(x, y, z)| {
                    source
                        .get_noise_biome(x, y, z, &self.climate, hint)
                        .clone()
                },
            )
            .collect()
    }
}
