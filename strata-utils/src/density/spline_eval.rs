//! Spline evaluation over raw point arrays, matching vanilla's
//! `CubicSpline.Multipoint.apply` in `f32`.

use crate::math::binary_search;

/// Largest `i` with `locations[i] <= input`, or `-1` when `input` precedes every
/// location.
#[inline]
#[must_use]
pub fn find_interval(locations: &[f32], input: f32) -> i32 {
    binary_search(0, locations.len() as i32, |i| input < locations[i as usize]) - 1
}

/// Hermite cubic between `(x1, y1)` and `(x2, y2)` with slopes `d1`, `d2`:
/// `lerp(t, y1, y2) + t * (1 - t) * lerp(t, a, b)`.
#[inline]
#[must_use]
pub fn hermite_interpolate(
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
    d1: f32,
    d2: f32,
    input: f32,
) -> f32 {
    let t = (input - x1) / (x2 - x1);
    let h = x2 - x1;
    let a = d1 * h - (y2 - y1);
    let b = -d2 * h + (y2 - y1);
    let lerp_y = y1 + t * (y2 - y1);
    let lerp_ab = a + t * (b - a);
    lerp_y + t * (1.0 - t) * lerp_ab
}

/// Evaluate a spline. Outside the point range the first or last value is
/// extended linearly along its derivative.
///
/// `locations` and `derivatives` have equal length; `value_at(i)` yields point
/// `i`'s value and is only called for the points that bound `input`.
#[inline]
pub fn evaluate_spline(
    locations: &[f32],
    derivatives: &[f32],
    input: f32,
    value_at: impl Fn(usize) -> f32,
) -> f32 {
    if locations.is_empty() {
        return 0.0;
    }

    let last = locations.len() - 1;
    let start = find_interval(locations, input);

    if start < 0 {
        return linear_extend(input, locations, derivatives, value_at(0), 0);
    }

    let start = start as usize;
    if start == last {
        return linear_extend(input, locations, derivatives, value_at(last), last);
    }

    hermite_interpolate(
        locations[start],
        locations[start + 1],
        value_at(start),
        value_at(start + 1),
        derivatives[start],
        derivatives[start + 1],
        input,
    )
}

#[inline]
fn linear_extend(input: f32, locations: &[f32], derivatives: &[f32], value: f32, i: usize) -> f32 {
    let slope = derivatives[i];
    if slope == 0.0 {
        value
    } else {
        value + slope * (input - locations[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_lookup() {
        let locs = [0.0, 1.0, 2.0];
        assert_eq!(find_interval(&locs, -1.0), -1);
        assert_eq!(find_interval(&locs, 0.5), 0);
        assert_eq!(find_interval(&locs, 1.0), 1);
        assert_eq!(find_interval(&locs, 3.0), 2);
    }

    #[test]
    fn zero_slopes_reduce_to_smooth_midpoint() {
        let v = hermite_interpolate(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.5);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn extends_linearly_outside_range() {
        let locs = [0.0_f32, 1.0];
        let before = evaluate_spline(&locs, &[2.0, 0.0], -1.0, |i| [0.0, 1.0][i]);
        assert!((before + 2.0).abs() < 1e-6);
        let after = evaluate_spline(&locs, &[0.0, 3.0], 2.0, |i| [0.0, 1.0][i]);
        assert!((after - 4.0).abs() < 1e-6);
    }

    #[test]
    fn zero_slope_extension_ignores_infinite_input() {
        let v = evaluate_spline(&[0.0], &[0.0], f32::INFINITY, |_| 0.25);
        assert!((v - 0.25).abs() < f32::EPSILON);
    }
}
