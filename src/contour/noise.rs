use rand::Rng;

// Skew/unskew factors for 3D simplex space
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

/// Edge midpoints of a cube: the 12 gradient directions.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Shuffled 0..=255 duplicated to 512 entries so lookups never wrap.
///
/// Built once and never mutated afterward.
#[derive(Clone)]
pub struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    /// Fisher-Yates shuffle of 0..=255 driven by `rng`.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..256).rev() {
            let j = rng.gen_range(0..=i);
            p.swap(i, j);
        }
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn at(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Gradient index for lattice corner (i, j, k), each already masked to 0..=255
    /// plus an offset of at most 1.
    #[inline]
    fn gradient(&self, i: usize, j: usize, k: usize) -> &'static [f64; 3] {
        &GRAD3[self.at(i + self.at(j + self.at(k))) % 12]
    }
}

/// 3D simplex gradient noise over a fixed permutation table.
#[derive(Clone)]
pub struct GradientNoiseField {
    table: PermutationTable,
}

impl GradientNoiseField {
    pub fn new(table: PermutationTable) -> Self {
        Self { table }
    }

    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self::new(PermutationTable::from_rng(rng))
    }

    /// Noise at (x, y, z), approximately in [-1, 1].
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        // Which simplex cell are we in?
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Which of the six tetrahedra?
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

        let corners = [
            (x0, y0, z0, 0, 0, 0),
            (
                x0 - i1 as f64 + G3,
                y0 - j1 as f64 + G3,
                z0 - k1 as f64 + G3,
                i1,
                j1,
                k1,
            ),
            (
                x0 - i2 as f64 + 2.0 * G3,
                y0 - j2 as f64 + 2.0 * G3,
                z0 - k2 as f64 + 2.0 * G3,
                i2,
                j2,
                k2,
            ),
            (
                x0 - 1.0 + 3.0 * G3,
                y0 - 1.0 + 3.0 * G3,
                z0 - 1.0 + 3.0 * G3,
                1,
                1,
                1,
            ),
        ];

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let mut n = 0.0;
        for (dx, dy, dz, oi, oj, ok) in corners {
            let mut falloff = 0.6 - dx * dx - dy * dy - dz * dz;
            if falloff > 0.0 {
                falloff *= falloff;
                let g = self.table.gradient(ii + oi, jj + oj, kk + ok);
                n += falloff * falloff * (g[0] * dx + g[1] * dy + g[2] * dz);
            }
        }

        32.0 * n
    }

    /// Noise remapped from [-1, 1] to [0, 1].
    pub fn sample_normalized(&self, x: f64, y: f64, z: f64) -> f64 {
        ((self.sample(x, y, z) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(seed: u64) -> GradientNoiseField {
        GradientNoiseField::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let table = PermutationTable::from_rng(&mut StdRng::seed_from_u64(1));
        let mut seen = [false; 256];
        for i in 0..256 {
            seen[table.perm[i] as usize] = true;
            assert_eq!(table.perm[i], table.perm[i + 256]);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = field(42);
        let b = field(42);
        for step in 0..50 {
            let p = step as f64 * 0.37;
            assert_eq!(a.sample(p, p * 1.3, -p), b.sample(p, p * 1.3, -p));
        }
    }

    #[test]
    fn test_zero_at_lattice_origin() {
        // Every corner contribution vanishes or is a dot with a zero vector.
        assert_eq!(field(3).sample(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_range() {
        let noise = field(7);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..5000 {
            let (x, y, z) = (
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let v = noise.sample(x, y, z);
            assert!(v.is_finite());
            assert!(v.abs() <= 1.1, "sample {v} out of range");
            let n = noise.sample_normalized(x, y, z);
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn test_continuity() {
        // Each corner kernel (0.6 - r^2)^4 (g . r) has slope at most ~0.163 * |g|,
        // |g| = sqrt(2), four corners, scaled by 32.
        let lipschitz = 32.0 * 4.0 * std::f64::consts::SQRT_2 * 0.17;
        let noise = field(11);
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..2000 {
            let (x, y, z) = (
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let h: f64 = 1e-4;
            let (dx, dy, dz) = (
                rng.gen_range(-h..h),
                rng.gen_range(-h..h),
                rng.gen_range(-h..h),
            );
            let dist = (dx * dx + dy * dy + dz * dz).sqrt();
            let jump = (noise.sample(x, y, z) - noise.sample(x + dx, y + dy, z + dz)).abs();
            assert!(jump <= lipschitz * dist + 1e-12, "jump {jump} over {dist}");
        }
    }

    #[test]
    fn test_not_constant() {
        let noise = field(5);
        let a = noise.sample(0.3, 0.7, 0.1);
        let b = noise.sample(4.1, 2.2, 9.9);
        assert_ne!(a, b);
    }
}
