//! Gradient (Perlin) noise for procedural textures.

use crate::sampling::random_vec3;
use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

const POINT_COUNT: usize = 256;

/// Seed used by [`Perlin::new`], so procedural textures look the same on every run.
pub const DEFAULT_SEED: u64 = 0x5EED_9E21;

/// Lattice noise with random unit gradients and three independent
/// permutation tables, one per axis.
pub struct Perlin {
    randvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let randvec = (0..POINT_COUNT)
            .map(|_| random_vec3(&mut rng, -1.0, 1.0).normalize_or_zero())
            .collect();

        Self {
            randvec,
            perm_x: generate_perm(&mut rng),
            perm_y: generate_perm(&mut rng),
            perm_z: generate_perm(&mut rng),
        }
    }

    /// Noise value in roughly `[-1, 1]`, continuous in `p`.
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);

        // Wrapping into the table is the same as taking the lattice index mod 256
        let i = floor.x as i64;
        let j = floor.y as i64;
        let k = floor.z as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[lattice(i + di as i64)]
                        ^ self.perm_y[lattice(j + dj as i64)]
                        ^ self.perm_z[lattice(k + dk as i64)];
                    *corner = self.randvec[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves, each at double frequency and half weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn lattice(n: i64) -> usize {
    (n & (POINT_COUNT as i64 - 1)) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients' dot products, with Hermite
/// smoothing of the weights.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }

    accum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_zero_on_lattice_points() {
        let perlin = Perlin::new();
        for p in [Vec3::ZERO, Vec3::new(3.0, -7.0, 12.0), Vec3::splat(255.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_is_bounded_and_continuous() {
        let perlin = Perlin::new();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..1000 {
            let p = random_vec3(&mut rng, -50.0, 50.0);
            let n = perlin.noise(p);
            assert!((-1.5..=1.5).contains(&n), "noise {n} at {p:?}");

            let nearby = perlin.noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = Perlin::with_seed(99);
        let b = Perlin::with_seed(99);
        let c = Perlin::with_seed(100);
        let p = Vec3::new(1.3, 2.7, -0.4);

        assert_eq!(a.noise(p), b.noise(p));
        assert_ne!(a.noise(p), c.noise(p));
    }

    #[test]
    fn test_permutations_are_complete() {
        let perlin = Perlin::new();
        for perm in [&perlin.perm_x, &perlin.perm_y, &perlin.perm_z] {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let p = random_vec3(&mut rng, -10.0, 10.0);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
        assert_eq!(perlin.turbulence(Vec3::new(0.5, 0.5, 0.5), 0), 0.0);
    }
}
