/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Java `Mth.floor`: rounds toward negative infinity and saturates like an
/// `(int)` cast.
#[inline]
#[must_use]
pub fn floor(v: f64) -> i32 {
    let i = v as i32;
    if v < f64::from(i) { i.saturating_sub(1) } else { i }
}

/// Java `Mth.lfloor`.
#[inline]
#[must_use]
pub fn lfloor(v: f64) -> i64 {
    let i = v as i64;
    if v < i as f64 { i.saturating_sub(1) } else { i }
}

/// `a + t * (b - a)`.
#[inline]
#[must_use]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Bilinear interpolation over a unit square.
#[inline]
#[must_use]
pub fn lerp2(tx: f64, ty: f64, v00: f64, v10: f64, v01: f64, v11: f64) -> f64 {
    lerp(ty, lerp(tx, v00, v10), lerp(tx, v01, v11))
}

/// Trilinear interpolation over a unit cube.
#[inline]
#[must_use]
#[expect(clippy::too_many_arguments, reason = "one weight per axis plus eight corners")]
pub fn lerp3(
    tx: f64,
    ty: f64,
    tz: f64,
    v000: f64,
    v100: f64,
    v010: f64,
    v110: f64,
    v001: f64,
    v101: f64,
    v011: f64,
    v111: f64,
) -> f64 {
    lerp(
        tz,
        lerp2(tx, ty, v000, v100, v010, v110),
        lerp2(tx, ty, v001, v101, v011, v111),
    )
}

/// `(value - start) / (end - start)`.
#[inline]
#[must_use]
pub fn inverse_lerp(value: f64, start: f64, end: f64) -> f64 {
    (value - start) / (end - start)
}

/// Lerp with the factor clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn clamped_lerp(start: f64, end: f64, t: f64) -> f64 {
    if t < 0.0 {
        start
    } else if t > 1.0 {
        end
    } else {
        lerp(t, start, end)
    }
}

/// Java `Mth.clamp(double, double, double)`: `value < min ? min : min(value, max)`.
///
/// Unlike [`f64::clamp`] this never panics on `min > max` and maps NaN to `max`.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min { min } else { value.min(max) }
}

/// Remap `value` from `[from_min, from_max]` onto `[to_min, to_max]`, clamping at
/// both ends.
#[inline]
#[must_use]
pub fn map_clamped(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    clamped_lerp(to_min, to_max, inverse_lerp(value, from_min, from_max))
}

/// `x * x`.
#[inline]
#[must_use]
pub fn square(x: f64) -> f64 {
    x * x
}

/// `x * x * x`.
#[inline]
#[must_use]
pub fn cube(x: f64) -> f64 {
    x * x * x
}

/// Smallest index in `[min, max)` for which `pred` holds, assuming `pred` is
/// monotone (false then true). Returns `max` when it never holds.
///
/// Matches `Mth.binarySearch`.
pub fn binary_search(mut min: i32, max: i32, pred: impl Fn(i32) -> bool) -> i32 {
    let mut len = max - min;
    while len > 0 {
        let half = len / 2;
        let mid = min + half;
        if pred(mid) {
            len = half;
        } else {
            min = mid + 1;
            len -= half + 1;
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rounds_toward_negative_infinity() {
        assert_eq!(floor(1.5), 1);
        assert_eq!(floor(1.0), 1);
        assert_eq!(floor(-0.5), -1);
        assert_eq!(floor(-1.0), -1);
        assert_eq!(floor(-1.5), -2);
        assert_eq!(lfloor(-1e12 - 0.5), -1_000_000_000_001);
        assert_eq!(floor(-1e12), i32::MIN);
        assert_eq!(floor(1e12), i32::MAX);
    }

    #[test]
    fn smoothstep_fixes_endpoints() {
        assert!(smoothstep(0.0).abs() < 1e-12);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-12);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn clamp_matches_java_ordering() {
        assert!((clamp(-2.0, -1.0, 1.0) + 1.0).abs() < f64::EPSILON);
        assert!((clamp(2.0, -1.0, 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp(0.25, -1.0, 1.0) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn map_clamped_saturates() {
        assert!((map_clamped(-100.0, 0.0, 10.0, 1.0, -1.0) - 1.0).abs() < f64::EPSILON);
        assert!((map_clamped(100.0, 0.0, 10.0, 1.0, -1.0) + 1.0).abs() < f64::EPSILON);
        assert!(map_clamped(5.0, 0.0, 10.0, 1.0, -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn binary_search_finds_first_true() {
        assert_eq!(binary_search(0, 10, |i| i >= 4), 4);
        assert_eq!(binary_search(0, 10, |_| false), 10);
        assert_eq!(binary_search(0, 10, |_| true), 0);
    }
}
