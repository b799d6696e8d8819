//! Random sampling helpers.
//!
//! Everything takes `&mut dyn RngCore` so each pixel can own an independently
//! seeded generator and renders stay reproducible across thread counts.

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform f32 in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform f32 in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Vector with components uniform in `[min, max)`.
pub fn random_vec3(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Uniformly distributed direction on the unit sphere (rejection sampling).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = random_vec3(rng, -1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-30 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniform point in the unit disk on the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform offset in the square `[-0.5, 0.5)²` on the XY plane.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}
