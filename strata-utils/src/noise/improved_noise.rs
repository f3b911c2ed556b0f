//! Single-octave gradient noise matching vanilla's `ImprovedNoise`.

use std::array;

use crate::math::{floor, lerp3, smoothstep};
use crate::noise::GRADIENT;
use crate::random::Random;

/// Vanilla adds `1.0E-7F` (a float literal) before flooring the Y fudge.
const SHIFT_UP_EPSILON: f64 = 1.0e-7_f32 as f64;

/// Improved Perlin noise over a shuffled 256-entry permutation.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    p: [u8; 256],
    /// X origin offset.
    pub xo: f64,
    /// Y origin offset.
    pub yo: f64,
    /// Z origin offset.
    pub zo: f64,
}

impl ImprovedNoise {
    /// Draw three origin offsets, then Fisher-Yates shuffle `0..=255`.
    pub fn new<R: Random>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p: [u8; 256] = array::from_fn(|i| i as u8);
        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, i + offset);
        }

        Self { p, xo, yo, zo }
    }

    /// Plain 3D sample.
    #[inline]
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise_with_y_scale(x, y, z, 0.0, 0.0)
    }

    /// 3D sample with the vertical fudge used by terrain noise.
    ///
    /// When `y_scale != 0` the Y offset inside the cell is snapped down to a
    /// multiple of `y_scale` (capped by `y_max` when it lies inside the cell)
    /// before the gradient dot products, while the fade still uses the raw offset.
    #[must_use]
    #[expect(clippy::similar_names, reason = "per-axis names mirror each other")]
    pub fn noise_with_y_scale(&self, x: f64, y: f64, z: f64, y_scale: f64, y_max: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xf = floor(x);
        let yf = floor(y);
        let zf = floor(z);

        let xr = x - f64::from(xf);
        let yr = y - f64::from(yf);
        let zr = z - f64::from(zf);

        let y_fudge = if y_scale == 0.0 {
            0.0
        } else {
            let limit = if y_max >= 0.0 && y_max < yr { y_max } else { yr };
            f64::from(floor(limit / y_scale + SHIFT_UP_EPSILON)) * y_scale
        };

        self.sample_and_lerp(xf, yf, zf, xr, yr - y_fudge, zr, yr)
    }

    #[inline]
    fn p(&self, i: i32) -> i32 {
        i32::from(self.p[(i & 0xFF) as usize])
    }

    #[expect(clippy::too_many_arguments, reason = "cell corner plus offsets")]
    fn sample_and_lerp(
        &self,
        x: i32,
        y: i32,
        z: i32,
        xr: f64,
        yr: f64,
        zr: f64,
        yr_original: f64,
    ) -> f64 {
        let x0 = self.p(x);
        let x1 = self.p(x + 1);
        let xy00 = self.p(x0 + y);
        let xy01 = self.p(x0 + y + 1);
        let xy10 = self.p(x1 + y);
        let xy11 = self.p(x1 + y + 1);

        let d000 = grad_dot(self.p(xy00 + z), xr, yr, zr);
        let d100 = grad_dot(self.p(xy10 + z), xr - 1.0, yr, zr);
        let d010 = grad_dot(self.p(xy01 + z), xr, yr - 1.0, zr);
        let d110 = grad_dot(self.p(xy11 + z), xr - 1.0, yr - 1.0, zr);
        let d001 = grad_dot(self.p(xy00 + z + 1), xr, yr, zr - 1.0);
        let d101 = grad_dot(self.p(xy10 + z + 1), xr - 1.0, yr, zr - 1.0);
        let d011 = grad_dot(self.p(xy01 + z + 1), xr, yr - 1.0, zr - 1.0);
        let d111 = grad_dot(self.p(xy11 + z + 1), xr - 1.0, yr - 1.0, zr - 1.0);

        lerp3(
            smoothstep(xr),
            smoothstep(yr_original),
            smoothstep(zr),
            d000,
            d100,
            d010,
            d110,
            d001,
            d101,
            d011,
            d111,
        )
    }
}

#[inline]
fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENT[(hash & 15) as usize];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}
