//! Homogeneous participating medium (fog, smoke) bounded by another primitive.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::gen_f32;
use crate::texture::Texture;
use crate::{Color, Material, Ray};
use glint_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Constant-density volume filling the interior of `boundary`.
///
/// A ray crossing the volume scatters at an exponentially distributed
/// distance; if that distance lies past the exit point the ray passes through.
/// The boundary must be closed and convex for entry/exit pairs to be correct.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo)),
        }
    }

    pub fn with_texture(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::textured(texture)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }
        if !self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.0001, f32::INFINITY), &mut exit, rng)
        {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        if !(hit_distance <= distance_inside_boundary) {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Normal and face are meaningless inside a volume
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
