//! Numeric helpers matching vanilla's `Mth` semantics (Java casts, floors and lerps).

mod noise_math;

pub use noise_math::{
    binary_search, clamp, clamped_lerp, cube, floor, inverse_lerp, lerp, lerp2, lerp3, lfloor,
    map_clamped, smoothstep, square,
};
