//! Climate points and parameter ranges.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::{PARAMETER_COUNT, QUANTIZATION_FACTOR, quantize_coord, unquantize_coord};

/// A sampled climate point.
///
/// All values are quantized (multiplied by 10000) so distances are integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetPoint {
    /// Temperature
    pub temperature: i64,
    /// Humidity (vegetation)
    pub humidity: i64,
    /// Continentalness
    pub continentalness: i64,
    /// Erosion
    pub erosion: i64,
    /// Depth
    pub depth: i64,
    /// Weirdness (ridges)
    pub weirdness: i64,
}

impl TargetPoint {
    /// A target from already-quantized values.
    #[must_use]
    pub const fn new(
        temperature: i64,
        humidity: i64,
        continentalness: i64,
        erosion: i64,
        depth: i64,
        weirdness: i64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            continentalness,
            erosion,
            depth,
            weirdness,
        }
    }

    /// A target from raw samples, quantized with [`quantize_coord`].
    #[must_use]
    pub fn from_floats(
        temperature: f64,
        humidity: f64,
        continentalness: f64,
        erosion: f64,
        depth: f64,
        weirdness: f64,
    ) -> Self {
        Self {
            temperature: quantize_coord(temperature),
            humidity: quantize_coord(humidity),
            continentalness: quantize_coord(continentalness),
            erosion: quantize_coord(erosion),
            depth: quantize_coord(depth),
            weirdness: quantize_coord(weirdness),
        }
    }

    /// The seven search coordinates; the offset axis is always 0.
    #[must_use]
    pub const fn to_parameter_array(&self) -> [i64; PARAMETER_COUNT] {
        [
            self.temperature,
            self.humidity,
            self.continentalness,
            self.erosion,
            self.depth,
            self.weirdness,
            0,
        ]
    }
}

/// An inclusive quantized range on one axis.
///
/// Decodes from a bare number (a point) or a `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Lower bound
    pub min: i64,
    /// Upper bound
    pub max: i64,
}

impl Parameter {
    /// A range from quantized bounds.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// A degenerate range at `value`.
    #[must_use]
    pub fn point(value: f32) -> Self {
        Self::span(value, value)
    }

    /// A range from raw bounds.
    #[must_use]
    pub fn span(min: f32, max: f32) -> Self {
        debug_assert!(min <= max, "min > max: {min} > {max}");
        Self {
            min: (min * QUANTIZATION_FACTOR) as i64,
            max: (max * QUANTIZATION_FACTOR) as i64,
        }
    }

    /// Distance from `target` to this range; 0 inside.
    #[inline]
    #[must_use]
    pub const fn distance(&self, target: i64) -> i64 {
        let above = target.saturating_sub(self.max);
        let below = self.min.saturating_sub(target);
        if above > 0 {
            above
        } else if below > 0 {
            below
        } else {
            0
        }
    }

    /// Integer midpoint, truncated toward zero.
    #[inline]
    #[must_use]
    pub const fn midpoint(&self) -> i64 {
        i64::midpoint(self.min, self.max)
    }

    /// The smallest range covering both.
    #[must_use]
    pub const fn union(&self, other: &Self) -> Self {
        Self {
            min: if self.min < other.min { self.min } else { other.min },
            max: if self.max > other.max { self.max } else { other.max },
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ParameterJson {
    Point(f32),
    Span([f32; 2]),
}

impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = if self.min == self.max {
            ParameterJson::Point(unquantize_coord(self.min))
        } else {
            ParameterJson::Span([unquantize_coord(self.min), unquantize_coord(self.max)])
        };
        json.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Parameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ParameterJson::deserialize(deserializer)? {
            ParameterJson::Point(v) => Ok(Self::point(v)),
            ParameterJson::Span([min, max]) if min > max => {
                Err(de::Error::custom(format!("min > max: {min} > {max}")))
            }
            ParameterJson::Span([min, max]) => Ok(Self::span(min, max)),
        }
    }
}

/// A biome's hypercube: six climate ranges plus an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterPoint {
    /// Temperature range
    pub temperature: Parameter,
    /// Humidity range
    pub humidity: Parameter,
    /// Continentalness range
    pub continentalness: Parameter,
    /// Erosion range
    pub erosion: Parameter,
    /// Depth range
    pub depth: Parameter,
    /// Weirdness range
    pub weirdness: Parameter,
    /// Offset (quantized); a constant penalty on every query.
    #[serde(with = "quantized_offset")]
    pub offset: i64,
}

impl ParameterPoint {
    /// A point from its ranges.
    #[must_use]
    pub const fn new(
        temperature: Parameter,
        humidity: Parameter,
        continentalness: Parameter,
        erosion: Parameter,
        depth: Parameter,
        weirdness: Parameter,
        offset: i64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            continentalness,
            erosion,
            depth,
            weirdness,
            offset,
        }
    }

    /// Squared distance to `target`. Lower is better.
    #[must_use]
    #[expect(clippy::many_single_char_names, reason = "one letter per climate axis")]
    pub const fn fitness(&self, target: &TargetPoint) -> i64 {
        let t = self.temperature.distance(target.temperature);
        let h = self.humidity.distance(target.humidity);
        let c = self.continentalness.distance(target.continentalness);
        let e = self.erosion.distance(target.erosion);
        let d = self.depth.distance(target.depth);
        let w = self.weirdness.distance(target.weirdness);
        t.saturating_mul(t)
            .saturating_add(h.saturating_mul(h))
            .saturating_add(c.saturating_mul(c))
            .saturating_add(e.saturating_mul(e))
            .saturating_add(d.saturating_mul(d))
            .saturating_add(w.saturating_mul(w))
            .saturating_add(self.offset.saturating_mul(self.offset))
    }

    /// The hypercube searched by the tree.
    #[must_use]
    pub const fn parameter_space(&self) -> [Parameter; PARAMETER_COUNT] {
        [
            self.temperature,
            self.humidity,
            self.continentalness,
            self.erosion,
            self.depth,
            self.weirdness,
            Parameter::new(self.offset, self.offset),
        ]
    }
}

mod quantized_offset {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::climate::{QUANTIZATION_FACTOR, unquantize_coord};

    pub fn serialize<S: Serializer>(offset: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(unquantize_coord(*offset))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = f32::deserialize(deserializer)?;
        Ok((raw * QUANTIZATION_FACTOR) as i64)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn target_point_from_floats() {
        let target = TargetPoint::from_floats(0.5, -0.3, 0.0, 0.1, 0.0, 0.2);
        assert_eq!(target, TargetPoint::new(5000, -3000, 0, 1000, 0, 2000));
    }

    #[test]
    fn parameter_distance() {
        let param = Parameter::new(-5000, 5000);
        assert_eq!(param.distance(0), 0);
        assert_eq!(param.distance(5000), 0);
        assert_eq!(param.distance(-5000), 0);
        assert_eq!(param.distance(6000), 1000);
        assert_eq!(param.distance(-6000), 1000);
    }

    #[test]
    fn midpoint_truncates_toward_zero() {
        assert_eq!(Parameter::new(-3, 0).midpoint(), -1);
        assert_eq!(Parameter::new(0, 3).midpoint(), 1);
    }

    #[test]
    fn fitness_includes_offset() {
        let zero = Parameter::new(0, 0);
        let params = ParameterPoint::new(zero, zero, zero, zero, zero, zero, 0);
        assert_eq!(params.fitness(&TargetPoint::new(0, 0, 0, 0, 0, 0)), 0);
        assert_eq!(params.fitness(&TargetPoint::new(100, 100, 0, 0, 0, 0)), 20_000);

        let offset = ParameterPoint::new(zero, zero, zero, zero, zero, zero, 300);
        assert_eq!(offset.fitness(&TargetPoint::default()), 90_000);
    }

    #[test]
    fn parameter_json_forms() {
        let point: Parameter = serde_json::from_value(json!(0.5)).expect("number");
        assert_eq!(point, Parameter::new(5000, 5000));
        let span: Parameter = serde_json::from_value(json!([-1.0, 0.25])).expect("pair");
        assert_eq!(span, Parameter::new(-10000, 2500));

        assert_eq!(serde_json::to_value(point).expect("serializable"), json!(0.5));
        assert_eq!(
            serde_json::to_value(span).expect("serializable"),
            json!([-1.0, 0.25])
        );
        assert!(serde_json::from_value::<Parameter>(json!("warm")).is_err());
    }

    #[test]
    fn inverted_pair_is_rejected() {
        let err = serde_json::from_value::<Parameter>(json!([0.5, -0.5])).expect_err("inverted");
        assert!(err.to_string().contains("min > max"), "{err}");
        let flat: Parameter = serde_json::from_value(json!([0.5, 0.5])).expect("degenerate");
        assert_eq!(flat, Parameter::point(0.5));
    }

    #[test]
    fn extreme_targets_saturate() {
        let param = Parameter::new(-10000, 10000);
        assert_eq!(param.distance(i64::MAX), i64::MAX - 10000);
        assert_eq!(param.distance(i64::MIN), i64::MAX - 9999);

        let full = Parameter::new(-10000, 10000);
        let params = ParameterPoint::new(full, full, full, full, full, full, 0);
        let target = TargetPoint::new(i64::MAX, i64::MIN, 0, 0, 0, 0);
        assert_eq!(params.fitness(&target), i64::MAX);
    }

    #[test]
    fn parameter_point_json() {
        let value = json!({
            "temperature": [-1.0, -0.45],
            "humidity": [-1.0, 1.0],
            "continentalness": [-0.19, 0.03],
            "erosion": 0.5,
            "depth": 0.0,
            "weirdness": [-1.0, 1.0],
            "offset": 0.0
        });
        let point: ParameterPoint = serde_json::from_value(value).expect("decodable");
        assert_eq!(point.temperature, Parameter::new(-10000, -4500));
        assert_eq!(point.erosion, Parameter::new(5000, 5000));
        assert_eq!(point.offset, 0);
    }
}
