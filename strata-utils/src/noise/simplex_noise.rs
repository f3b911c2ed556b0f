//! Simplex noise matching vanilla's `SimplexNoise`.
//!
//! Only the End island field uses it, through [`get_value_2d`](SimplexNoise::get_value_2d).

use std::array;

use crate::math::floor;
use crate::noise::GRADIENT;
use crate::random::Random;

#[expect(clippy::unreadable_literal, reason = "exact vanilla constant")]
const SQRT_3: f64 = 1.7320508075688772;
/// 2D skew: `(sqrt(3) - 1) / 2`.
const F2: f64 = 0.5 * (SQRT_3 - 1.0);
/// 2D unskew: `(3 - sqrt(3)) / 6`.
const G2: f64 = (3.0 - SQRT_3) / 6.0;
/// 3D skew.
const F3: f64 = 1.0 / 3.0;
/// 3D unskew.
const G3: f64 = 1.0 / 6.0;

/// Simplex noise over a 512-entry mirrored permutation.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    p: [i32; 512],
    /// X origin offset.
    pub xo: f64,
    /// Y origin offset.
    pub yo: f64,
    /// Z origin offset.
    pub zo: f64,
}

impl SimplexNoise {
    /// Draw three offsets and shuffle the permutation the same way
    /// [`ImprovedNoise`](crate::noise::ImprovedNoise) does.
    pub fn new<R: Random>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p: [i32; 512] = array::from_fn(|i| i as i32);
        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, offset + i);
        }
        p.copy_within(..256, 256);

        Self { p, xo, yo, zo }
    }

    #[inline]
    const fn p(&self, i: i32) -> i32 {
        self.p[(i & 0xFF) as usize]
    }

    #[inline]
    fn corner(gradient: i32, x: f64, y: f64, z: f64, falloff: f64) -> f64 {
        let t = falloff - x * x - y * y - z * z;
        if t < 0.0 {
            return 0.0;
        }
        let g = &GRADIENT[gradient as usize];
        let t = t * t;
        t * t * (f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z)
    }

    /// 2D sample, roughly in `[-1, 1]`.
    #[must_use]
    pub fn get_value_2d(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = floor(x + s);
        let j = floor(y + s);
        let t = f64::from(i + j) * G2;
        let x0 = x - (f64::from(i) - t);
        let y0 = y - (f64::from(j) - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + G2;
        let y1 = y0 - f64::from(j1) + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = i & 0xFF;
        let jj = j & 0xFF;
        let g0 = self.p(ii + self.p(jj)) % 12;
        let g1 = self.p(ii + i1 + self.p(jj + j1)) % 12;
        let g2 = self.p(ii + 1 + self.p(jj + 1)) % 12;

        70.0 * (Self::corner(g0, x0, y0, 0.0, 0.5)
            + Self::corner(g1, x1, y1, 0.0, 0.5)
            + Self::corner(g2, x2, y2, 0.0, 0.5))
    }

    /// 3D sample, roughly in `[-1, 1]`.
    #[must_use]
    #[expect(clippy::many_single_char_names, reason = "simplex corner algebra")]
    pub fn get_value_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = floor(x + s);
        let j = floor(y + s);
        let k = floor(z + s);
        let t = f64::from(i + j + k) * G3;
        let x0 = x - (f64::from(i) - t);
        let y0 = y - (f64::from(j) - t);
        let z0 = z - (f64::from(k) - t);

        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - f64::from(i1) + G3;
        let y1 = y0 - f64::from(j1) + G3;
        let z1 = z0 - f64::from(k1) + G3;
        let x2 = x0 - f64::from(i2) + F3;
        let y2 = y0 - f64::from(j2) + F3;
        let z2 = z0 - f64::from(k2) + F3;
        let x3 = x0 - 0.5;
        let y3 = y0 - 0.5;
        let z3 = z0 - 0.5;

        let ii = i & 0xFF;
        let jj = j & 0xFF;
        let kk = k & 0xFF;
        let g0 = self.p(ii + self.p(jj + self.p(kk))) % 12;
        let g1 = self.p(ii + i1 + self.p(jj + j1 + self.p(kk + k1))) % 12;
        let g2 = self.p(ii + i2 + self.p(jj + j2 + self.p(kk + k2))) % 12;
        let g3 = self.p(ii + 1 + self.p(jj + 1 + self.p(kk + 1))) % 12;

        32.0 * (Self::corner(g0, x0, y0, z0, 0.6)
            + Self::corner(g1, x1, y1, z1, 0.6)
            + Self::corner(g2, x2, y2, z2, 0.6)
            + Self::corner(g3, x3, y3, z3, 0.6))
    }
}
