//! The per-seed baking pass.
//!
//! [`BakeCoordinator`] instantiates every registered noise up front, then bakes
//! density function roots on demand as references are met. Each root is baked
//! at most once; the [`BakeLedger`] records finished roots and the roots whose
//! bake is still on the stack, which is how reference cycles are caught.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use strata_registry::Registry;
use strata_utils::Identifier;
use strata_utils::density::{BakeError, DensityBaker, DensityFunction, EndIslands};
use strata_utils::noise::{
    BlendedNoise, BlendedNoiseParams, NoiseError, NoiseParameters, NormalNoise,
};
use strata_utils::random::legacy_random::LegacyRandom;
use strata_utils::random::{PositionalRandom, Random, RandomKind, RandomSplitter};
use tracing::{debug, trace};

use super::WorldgenError;

static TEMPERATURE: Identifier = Identifier::vanilla_static("temperature");
static VEGETATION: Identifier = Identifier::vanilla_static("vegetation");
static OFFSET: Identifier = Identifier::vanilla_static("offset");

/// Hash key of the modern blended noise random.
const TERRAIN_HASH: &str = "minecraft:terrain";

/// Baked roots and the bakes currently in progress.
#[derive(Debug, Default)]
pub struct BakeLedger {
    baked: FxHashMap<Identifier, Arc<DensityFunction>>,
    in_progress: FxHashSet<Identifier>,
}

impl BakeLedger {
    /// The baked root registered under `id`, if its bake finished.
    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<&Arc<DensityFunction>> {
        self.baked.get(id)
    }

    /// Whether `id` finished baking.
    #[must_use]
    pub fn is_baked(&self, id: &Identifier) -> bool {
        self.baked.contains_key(id)
    }

    /// Number of finished roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.baked.len()
    }

    /// Whether nothing finished baking yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.baked.is_empty()
    }

    fn begin(&mut self, id: &Identifier) -> Result<(), BakeError> {
        if self.in_progress.insert(id.clone()) {
            Ok(())
        } else {
            Err(BakeError::CyclicReference(id.clone()))
        }
    }

    fn finish(&mut self, id: &Identifier, baked: Arc<DensityFunction>) {
        self.in_progress.remove(id);
        self.baked.insert(id.clone(), baked);
    }
}

/// The read-only result of a baking pass, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BakedRegistries {
    /// Baked density function roots.
    pub density_functions: Registry<Arc<DensityFunction>>,
    /// Instantiated noise samplers.
    pub noises: Registry<Arc<NormalNoise>>,
}

/// Single-owner builder that bakes one registry for one seed.
///
/// Implements [`DensityBaker`], so it can also bake trees that live outside the
/// registry, like a noise router.
#[derive(Debug)]
pub struct BakeCoordinator<'a> {
    seed: u64,
    kind: RandomKind,
    splitter: RandomSplitter,
    functions: &'a Registry<DensityFunction>,
    noise_order: Vec<Identifier>,
    noises: FxHashMap<Identifier, Arc<NormalNoise>>,
    blended: Vec<Arc<BlendedNoise>>,
    end_islands: Option<Arc<EndIslands>>,
    ledger: BakeLedger,
}

impl<'a> BakeCoordinator<'a> {
    /// Derive the root splitter for `seed` and instantiate every noise in `noises`.
    ///
    /// # Errors
    /// `BakeError::Noise` when a noise definition cannot be built.
    pub fn new(
        seed: u64,
        kind: RandomKind,
        functions: &'a Registry<DensityFunction>,
        noises: &Registry<NoiseParameters>,
    ) -> Result<Self, BakeError> {
        let splitter = kind.new_instance(seed).next_positional();

        let mut noise_order = Vec::with_capacity(noises.len());
        let mut instantiated = FxHashMap::default();
        for (key, parameters) in noises {
            let noise = instantiate_noise(seed, kind, &splitter, key, parameters)?;
            noise_order.push(key.clone());
            instantiated.insert(key.clone(), Arc::new(noise));
        }
        debug!(seed, ?kind, count = instantiated.len(), "noises instantiated");

        Ok(Self {
            seed,
            kind,
            splitter,
            functions,
            noise_order,
            noises: instantiated,
            blended: Vec::new(),
            end_islands: None,
            ledger: BakeLedger::default(),
        })
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The root splitter every noise is keyed from.
    #[must_use]
    pub const fn splitter(&self) -> &RandomSplitter {
        &self.splitter
    }

    /// Roots baked so far.
    #[must_use]
    pub const fn ledger(&self) -> &BakeLedger {
        &self.ledger
    }

    /// Bake every registered root not yet in the ledger.
    ///
    /// # Errors
    /// The first [`BakeError`] met while baking.
    pub fn bake_registry(&mut self) -> Result<(), BakeError> {
        let functions = self.functions;
        for (key, _) in functions {
            self.resolve_reference(key)?;
        }
        debug!(count = self.ledger.len(), "density functions baked");
        Ok(())
    }

    /// Freeze the baked roots and noises into read-only registries.
    ///
    /// Roots that were never reached are left out; call
    /// [`bake_registry`](Self::bake_registry) first for a complete set.
    pub fn finish(self) -> Result<BakedRegistries, WorldgenError> {
        let mut baked = BakedRegistries::default();
        for (key, _) in self.functions {
            if let Some(function) = self.ledger.get(key) {
                baked
                    .density_functions
                    .register(key.clone(), function.clone())?;
            }
        }
        for key in self.noise_order {
            if let Some(noise) = self.noises.get(&key) {
                let noise = noise.clone();
                baked.noises.register(key, noise)?;
            }
        }
        Ok(baked)
    }
}

impl DensityBaker for BakeCoordinator<'_> {
    fn resolve_reference(&mut self, id: &Identifier) -> Result<Arc<DensityFunction>, BakeError> {
        if let Some(baked) = self.ledger.get(id) {
            return Ok(baked.clone());
        }
        let functions = self.functions;
        let source = functions
            .get(id)
            .ok_or_else(|| BakeError::MissingReference(id.clone()))?;

        self.ledger.begin(id)?;
        trace!(%id, "baking density function");
        let baked = Arc::new(source.bake(self)?);
        self.ledger.finish(id, baked.clone());
        Ok(baked)
    }

    fn noise(&mut self, id: &Identifier) -> Result<Arc<NormalNoise>, BakeError> {
        self.noises
            .get(id)
            .cloned()
            .ok_or_else(|| BakeError::MissingNoise(id.clone()))
    }

    fn blended_noise(
        &mut self,
        params: &BlendedNoiseParams,
    ) -> Result<Arc<BlendedNoise>, BakeError> {
        if let Some(existing) = self.blended.iter().find(|noise| noise.params() == params) {
            return Ok(existing.clone());
        }
        let noise = match self.kind {
            RandomKind::Legacy => {
                BlendedNoise::new(&mut LegacyRandom::from_seed(self.seed), *params)?
            }
            RandomKind::Xoroshiro => {
                BlendedNoise::new(&mut self.splitter.with_hash_of(TERRAIN_HASH), *params)?
            }
        };
        let noise = Arc::new(noise);
        self.blended.push(noise.clone());
        Ok(noise)
    }

    fn end_islands(&mut self) -> Result<Arc<EndIslands>, BakeError> {
        let seed = self.seed;
        Ok(self
            .end_islands
            .get_or_insert_with(|| Arc::new(EndIslands::new(seed)))
            .clone())
    }
}

/// Build one noise sampler.
///
/// Legacy-random worlds replace the climate noises with their pre-1.18 forms.
fn instantiate_noise(
    seed: u64,
    kind: RandomKind,
    splitter: &RandomSplitter,
    key: &Identifier,
    parameters: &NoiseParameters,
) -> Result<NormalNoise, NoiseError> {
    if kind == RandomKind::Legacy {
        if *key == TEMPERATURE {
            return legacy_climate_noise(seed);
        }
        if *key == VEGETATION {
            return legacy_climate_noise(seed.wrapping_add(1));
        }
        if *key == OFFSET {
            let mut random = splitter.with_hash_of(&OFFSET.to_string());
            return Ok(NormalNoise::create(
                &mut random,
                &NoiseParameters::new(0, vec![0.0]),
            ));
        }
    }
    let mut random = splitter.with_hash_of(&key.to_string());
    Ok(NormalNoise::create(&mut random, parameters))
}

fn legacy_climate_noise(seed: u64) -> Result<NormalNoise, NoiseError> {
    NormalNoise::create_legacy_nether_biome(
        &mut LegacyRandom::from_seed(seed),
        &NoiseParameters::new(-7, vec![1.0, 1.0]),
    )
}

/// Run one complete baking pass over `functions` for `seed`.
///
/// # Errors
/// The first failure while instantiating noises or baking roots.
pub fn bake_all(
    seed: u64,
    kind: RandomKind,
    functions: &Registry<DensityFunction>,
    noises: &Registry<NoiseParameters>,
) -> Result<BakedRegistries, WorldgenError> {
    let mut coordinator = BakeCoordinator::new(seed, kind, functions, noises)?;
    coordinator.bake_registry()?;
    coordinator.finish()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strata_utils::density::FunctionContext;

    use super::*;

    fn registry(entries: &[(&'static str, serde_json::Value)]) -> Registry<DensityFunction> {
        let mut registry = Registry::new();
        for (key, value) in entries {
            let function = DensityFunction::decode(value).expect("decodable");
            registry
                .register(Identifier::vanilla_static(key), function)
                .expect("unique");
        }
        registry
    }

    fn noises() -> Registry<NoiseParameters> {
        let mut registry = Registry::new();
        registry
            .register(
                Identifier::vanilla_static("test"),
                NoiseParameters::new(-3, vec![1.0, 1.0]),
            )
            .expect("unique");
        registry
    }

    #[test]
    fn references_resolve_in_any_order() {
        let functions = registry(&[
            ("outer", json!({"type": "minecraft:add", "argument1": "minecraft:inner", "argument2": 1.0})),
            ("inner", json!(2.0)),
        ]);
        let baked = bake_all(0, RandomKind::Xoroshiro, &functions, &noises()).expect("bakes");

        let outer = baked
            .density_functions
            .get(&Identifier::vanilla_static("outer"))
            .expect("baked");
        assert!((outer.compute(&FunctionContext::default()) - 3.0).abs() < f64::EPSILON);
        assert_eq!(baked.density_functions.len(), 2);
        assert_eq!(baked.noises.len(), 1);
    }

    #[test]
    fn shared_roots_are_baked_once() {
        let functions = registry(&[
            ("a", json!("minecraft:shared")),
            ("b", json!("minecraft:shared")),
            ("shared", json!({"type": "minecraft:noise", "noise": "minecraft:test", "xz_scale": 1.0, "y_scale": 1.0})),
        ]);
        let mut coordinator =
            BakeCoordinator::new(1, RandomKind::Xoroshiro, &functions, &noises()).expect("noises");
        coordinator.bake_registry().expect("bakes");

        let shared = coordinator
            .resolve_reference(&Identifier::vanilla_static("shared"))
            .expect("baked");
        let again = coordinator
            .resolve_reference(&Identifier::vanilla_static("shared"))
            .expect("baked");
        assert!(Arc::ptr_eq(&shared, &again));
        assert_eq!(coordinator.ledger().len(), 3);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let functions = registry(&[(
            "loop",
            json!({"type": "minecraft:abs", "argument": "minecraft:loop"}),
        )]);
        let err = bake_all(0, RandomKind::Xoroshiro, &functions, &noises()).expect_err("cyclic");
        assert_eq!(
            err,
            WorldgenError::Bake(BakeError::CyclicReference(Identifier::vanilla_static("loop")))
        );
    }

    #[test]
    fn missing_noise_is_reported() {
        let functions = registry(&[(
            "n",
            json!({"type": "minecraft:noise", "noise": "minecraft:absent", "xz_scale": 1.0, "y_scale": 1.0}),
        )]);
        let err = bake_all(0, RandomKind::Xoroshiro, &functions, &noises()).expect_err("absent");
        assert_eq!(
            err,
            WorldgenError::Bake(BakeError::MissingNoise(Identifier::vanilla_static("absent")))
        );
    }

    #[test]
    fn legacy_worlds_override_climate_noises() {
        let mut noises = Registry::new();
        noises
            .register(
                Identifier::vanilla_static("temperature"),
                NoiseParameters::new(2, vec![1.0]),
            )
            .expect("unique");
        // The legacy temperature override ignores the registered parameters.
        assert!(BakeCoordinator::new(0, RandomKind::Legacy, &Registry::new(), &noises).is_ok());

        let functions = registry(&[(
            "terrain",
            json!({"type": "minecraft:old_blended_noise", "xz_scale": 1.0, "y_scale": 1.0, "xz_factor": 80.0, "y_factor": 160.0, "smear_scale_multiplier": 8.0}),
        )]);
        let baked = bake_all(0, RandomKind::Legacy, &functions, &noises).expect("bakes");
        assert_eq!(baked.density_functions.len(), 1);
    }

    #[test]
    fn blended_noise_is_shared_per_params() {
        let node = json!({"type": "minecraft:old_blended_noise", "xz_scale": 1.0, "y_scale": 1.0, "xz_factor": 80.0, "y_factor": 160.0, "smear_scale_multiplier": 8.0});
        let functions = registry(&[("a", node.clone()), ("b", node)]);
        let mut coordinator =
            BakeCoordinator::new(5, RandomKind::Xoroshiro, &functions, &noises()).expect("noises");
        coordinator.bake_registry().expect("bakes");
        assert_eq!(coordinator.blended.len(), 1);
    }
}
