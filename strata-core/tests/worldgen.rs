//! End-to-end worldgen tests.
//!
//! Builds small registries from JSON, bakes them for a seed and checks the
//! sampled values and biome lookups that come out the other end.

use anyhow::Result;
use serde_json::{Value, json};
use strata_core::worldgen::{
    BakeCoordinator, MultiNoiseBiomeSource, NoiseSettings, RandomState, WorldgenError, bake_all,
};
use strata_registry::WorldgenRegistries;
use strata_utils::Identifier;
use strata_utils::climate::TargetPoint;
use strata_utils::density::{BakeError, DensityBaker, FunctionContext};
use strata_utils::random::RandomKind;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn registries() -> Result<WorldgenRegistries> {
    let mut registries = WorldgenRegistries::default();
    registries.register_noises(&json!({
        "minecraft:temperature": {"firstOctave": -10, "amplitudes": [1.5, 0.0, 1.0, 0.0, 0.0, 0.0]},
        "minecraft:offset": {"firstOctave": -3, "amplitudes": [1.0, 1.0, 1.0, 0.0]},
        "minecraft:ridge": {"firstOctave": -7, "amplitudes": [1.0, 2.0, 1.0, 0.0, 0.0, 0.0]}
    }))?;
    registries.register_density_functions(&json!({
        "minecraft:shift_x": {"type": "minecraft:flat_cache", "argument": {"type": "minecraft:cache_2d", "argument": {"type": "minecraft:shift_a", "argument": "minecraft:offset"}}},
        "minecraft:shift_z": {"type": "minecraft:flat_cache", "argument": {"type": "minecraft:cache_2d", "argument": {"type": "minecraft:shift_b", "argument": "minecraft:offset"}}},
        "minecraft:overworld/temperature": {
            "type": "minecraft:shifted_noise", "noise": "minecraft:temperature",
            "xz_scale": 0.25, "y_scale": 0.0,
            "shift_x": "minecraft:shift_x", "shift_y": 0.0, "shift_z": "minecraft:shift_z"
        },
        "minecraft:overworld/ridges": {
            "type": "minecraft:flat_cache",
            "argument": {"type": "minecraft:shifted_noise", "noise": "minecraft:ridge",
                "xz_scale": 0.25, "y_scale": 0.0,
                "shift_x": "minecraft:shift_x", "shift_y": 0.0, "shift_z": "minecraft:shift_z"}
        },
        "minecraft:overworld/depth": {"type": "minecraft:y_clamped_gradient", "from_y": -64, "to_y": 320, "from_value": 1.5, "to_value": -1.5}
    }))?;
    registries.register_multi_noise_presets(&json!({
        "minecraft:test": [
            {"biome": "minecraft:snowy_plains", "parameters": {
                "temperature": [-1.0, -0.45], "humidity": [-1.0, 1.0], "continentalness": [-1.0, 1.0],
                "erosion": [-1.0, 1.0], "depth": 0.0, "weirdness": [-1.0, 1.0], "offset": 0.0}},
            {"biome": "minecraft:desert", "parameters": {
                "temperature": [0.55, 1.0], "humidity": [-1.0, 1.0], "continentalness": [-1.0, 1.0],
                "erosion": [-1.0, 1.0], "depth": 0.0, "weirdness": [-1.0, 1.0], "offset": 0.0}}
        ]
    }))?;
    Ok(registries)
}

fn settings_json() -> Value {
    json!({
        "legacy_random_source": false,
        "noise_router": {
            "barrier": 0.0,
            "fluid_level_floodedness": 0.0,
            "fluid_level_spread": 0.0,
            "lava": 0.0,
            "temperature": "minecraft:overworld/temperature",
            "vegetation": 0.0,
            "continents": 0.0,
            "erosion": {"type": "minecraft:end_islands"},
            "depth": "minecraft:overworld/depth",
            "ridges": "minecraft:overworld/ridges",
            "preliminary_surface_level": 64.0,
            "final_density": {"type": "minecraft:mul", "argument1": "minecraft:overworld/depth", "argument2": {
                "type": "minecraft:old_blended_noise", "xz_scale": 1.0, "y_scale": 1.0,
                "xz_factor": 80.0, "y_factor": 160.0, "smear_scale_multiplier": 8.0}},
            "vein_toggle": 0.0,
            "vein_ridged": 0.0,
            "vein_gap": 0.0
        }
    })
}

fn random_state(seed: u64) -> Result<RandomState> {
    let settings = NoiseSettings::decode(&settings_json())?;
    Ok(RandomState::new(seed, &settings, &registries()?)?)
}

#[test]
fn random_state_bakes_every_router_entry() -> Result<()> {
    init_tracing();
    let state = random_state(12345)?;

    state.router().validate_baked()?;
    assert_eq!(state.baked().density_functions.len(), 5);
    assert_eq!(state.baked().noises.len(), 3);

    let pos = FunctionContext::new(100, 64, -200);
    let temperature = state.sample(&state.router().temperature, pos);
    let by_key = state
        .sample_key(&Identifier::vanilla_static("overworld/temperature"), pos)
        .expect("registered");
    assert!((temperature - by_key).abs() < f64::EPSILON);
    assert!(temperature.is_finite());

    // The End island field is 0.5625 at the origin for every seed.
    let erosion = state.sample(&state.router().erosion, FunctionContext::default());
    assert!((erosion - 0.5625).abs() < 1e-9);
    Ok(())
}

#[test]
fn same_seed_same_samples() -> Result<()> {
    let first = random_state(99)?;
    let second = random_state(99)?;
    let other = random_state(100)?;

    let mut differs = false;
    for x in (-512..512).step_by(61) {
        let pos = FunctionContext::new(x, 0, x * 3);
        let a = first.sample(&first.router().final_density, pos);
        let b = second.sample(&second.router().final_density, pos);
        assert!((a - b).abs() < f64::EPSILON);

        let t = first.sample(&first.router().temperature, pos);
        let u = other.sample(&other.router().temperature, pos);
        differs |= (t - u).abs() > f64::EPSILON;
    }
    assert!(differs, "different seeds produced identical temperature");
    Ok(())
}

#[test]
fn baking_a_baked_router_is_idempotent() -> Result<()> {
    let registries = registries()?;
    let settings = NoiseSettings::decode(&settings_json())?;
    let state = RandomState::new(7, &settings, &registries)?;

    // A fresh coordinator with no roots and no noises: any request would fail.
    let empty = WorldgenRegistries::default();
    let mut coordinator =
        BakeCoordinator::new(7, RandomKind::Xoroshiro, &empty.density_functions, &empty.noises)?;
    let rebaked = state.router().bake(&mut coordinator)?;
    assert!(coordinator.ledger().is_empty());
    assert!(
        coordinator
            .noise(&Identifier::vanilla_static("temperature"))
            .is_err()
    );

    for (x, z) in [(0, 0), (1000, -1000), (-37, 4096)] {
        let pos = FunctionContext::new(x, 32, z);
        for ((name, before), (_, after)) in state.router().entries().iter().zip(rebaked.entries()) {
            let a = before.compute(&pos);
            let b = after.compute(&pos);
            assert!((a - b).abs() < f64::EPSILON, "{name} changed after rebake");
        }
    }
    Ok(())
}

#[test]
fn cyclic_references_fail_to_bake() -> Result<()> {
    let mut registries = WorldgenRegistries::default();
    registries.register_density_functions(&json!({
        "minecraft:a": {"type": "minecraft:add", "argument1": 1.0, "argument2": "minecraft:b"},
        "minecraft:b": {"type": "minecraft:abs", "argument": "minecraft:a"}
    }))?;
    let err = bake_all(
        0,
        RandomKind::Xoroshiro,
        &registries.density_functions,
        &registries.noises,
    )
    .expect_err("cycle");
    assert!(matches!(err, WorldgenError::Bake(BakeError::CyclicReference(_))));
    Ok(())
}

#[test]
fn missing_reference_fails_random_state() -> Result<()> {
    let mut settings = settings_json();
    settings["noise_router"]["vein_gap"] = json!("minecraft:absent");
    let settings = NoiseSettings::decode(&settings)?;
    let err = RandomState::new(0, &settings, &registries()?).expect_err("missing");
    assert_eq!(
        err,
        WorldgenError::Bake(BakeError::MissingReference(Identifier::vanilla_static(
            "absent"
        )))
    );
    Ok(())
}

#[test]
fn legacy_random_source_bakes() -> Result<()> {
    let mut settings = settings_json();
    settings["legacy_random_source"] = json!(true);
    let settings = NoiseSettings::decode(&settings)?;
    let state = RandomState::new(42, &settings, &registries()?)?;
    assert_eq!(state.random_kind(), RandomKind::Legacy);

    let modern = random_state(42)?;
    let pos = FunctionContext::new(300, 0, 300);
    let legacy_temperature = state.sample(&state.router().temperature, pos);
    let modern_temperature = modern.sample(&modern.router().temperature, pos);
    assert!((legacy_temperature - modern_temperature).abs() > f64::EPSILON);
    Ok(())
}

#[test]
fn two_biome_lookup() -> Result<()> {
    let registries = registries()?;
    let source =
        MultiNoiseBiomeSource::from_preset(&registries, &Identifier::vanilla_static("test"))?;
    let list = source.parameters();
    let mut hint = None;

    let cold = TargetPoint::from_floats(-0.8, 0.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(list.find_value(&cold, &mut hint).path, "snowy_plains");

    let hot = TargetPoint::from_floats(0.9, 0.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(list.find_value(&hot, &mut hint).path, "desert");

    // Outside both: 0.4 is 0.15 from desert and 0.85 from snowy plains.
    let mild = TargetPoint::from_floats(0.4, 0.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(list.find_value(&mild, &mut hint).path, "desert");
    assert_eq!(list.find_value_brute_force(&mild).path, "desert");
    Ok(())
}

#[test]
fn parallel_biomes_match_sequential() -> Result<()> {
    let registries = registries()?;
    let state = random_state(2024)?;
    let source =
        MultiNoiseBiomeSource::from_preset(&registries, &Identifier::vanilla_static("test"))?;

    let positions: Vec<(i32, i32, i32)> = (-40..40)
        .flat_map(|x| (-40..40).step_by(7).map(move |z| (x * 5, 16, z * 5)))
        .collect();
    let parallel = state.sample_biomes(&source, &positions);

    let mut hint = None;
    let sequential: Vec<Identifier> = positions
        .iter()
        .map(|&(x, y, z)| {
            source
                .get_noise_biome(x, y, z, state.climate_sampler(), &mut hint)
                .clone()
        })
        .collect();
    assert_eq!(parallel, sequential);

    for (&(x, y, z), biome) in positions.iter().zip(&parallel) {
        let target = state.climate_sampler().sample(x, y, z);
        assert_eq!(source.parameters().find_value_brute_force(&target), biome);
    }
    Ok(())
}

#[test]
fn end_source_uses_seeded_islands() -> Result<()> {
    let state = random_state(1)?;
    let source = state.end_biome_source();
    assert_eq!(source.get_noise_biome(0, 0).path, "the_end");
    assert_ne!(source.get_noise_biome(2000, 2000).path, "the_end");
    Ok(())
}
