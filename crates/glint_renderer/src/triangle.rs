//! Triangle primitive for ray tracing.
//!
//! Intersection solves `p0 + beta*(p1 - p0) + gamma*(p2 - p0) = o + t*d`
//! for `(beta, gamma, t)` with Cramer's rule.

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use glint_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Below this the 3x3 system is treated as singular (degenerate triangle or
/// ray parallel to its plane).
const DETERMINANT_EPSILON: f32 = 1e-12;

/// A flat-shaded triangle.
pub struct Triangle {
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        let bbox = Aabb::from_points(p0.min(p1).min(p2), p0.max(p1).max(p2));

        Self {
            p0,
            p1,
            p2,
            normal,
            material,
            bbox,
        }
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let (p0, p1, p2) = (self.p0, self.p1, self.p2);
        let dir = ray.direction();
        let orig = ray.origin();

        // Columns of the system matrix and the right-hand side
        let (a, b, c) = (p0.x - p1.x, p0.y - p1.y, p0.z - p1.z);
        let (d, e, f) = (p0.x - p2.x, p0.y - p2.y, p0.z - p2.z);
        let (g, h, i) = (dir.x, dir.y, dir.z);
        let (j, k, l) = (p0.x - orig.x, p0.y - orig.y, p0.z - orig.z);

        let ei_hf = e * i - h * f;
        let gf_di = g * f - d * i;
        let dh_eg = d * h - e * g;

        let denominator = a * ei_hf + b * gf_di + c * dh_eg;
        if !(denominator.abs() > DETERMINANT_EPSILON) {
            return false;
        }

        // Written as negated range checks so NaN counts as a miss
        let beta = (j * ei_hf + k * gf_di + l * dh_eg) / denominator;
        if !(beta > 0.0 && beta < 1.0) {
            return false;
        }

        let ak_jb = a * k - j * b;
        let jc_al = j * c - a * l;
        let bl_kc = b * l - k * c;

        let gamma = (i * ak_jb + h * jc_al + g * bl_kc) / denominator;
        if !(gamma > 0.0 && beta + gamma < 1.0) {
            return false;
        }

        let t = -(f * ak_jb + e * jc_al + d * bl_kc) / denominator;
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.u = beta;
        rec.v = gamma;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn xy_triangle() -> Triangle {
        // Triangle in the z=-1 plane
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    fn cast<'a>(tri: &'a Triangle, ray: &Ray) -> Option<HitRecord<'a>> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        tri.hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
            .then_some(rec)
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = cast(&tri, &ray).expect("ray should hit");

        assert!((rec.t - 1.0).abs() < 0.001);
        assert!((rec.p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_barycentric_coordinates() {
        let tri = xy_triangle();
        // p0 + 0.25*(p1 - p0) + 0.5*(p2 - p0) = (0.0, 0.0, -1.0)
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z);
        let rec = cast(&tri, &ray).expect("ray should hit");

        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        let away = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        assert!(cast(&tri, &away).is_none());

        let beside = Ray::new_simple(Vec3::new(0.9, 0.9, 0.0), -Vec3::Z);
        assert!(cast(&tri, &beside).is_none());
    }

    #[test]
    fn test_back_face_hit_flips_normal() {
        let tri = xy_triangle();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let rec = cast(&tri, &ray).expect("ray should hit");

        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let collinear = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, grey());
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);

        assert!(cast(&collinear, &ray).is_none());
        assert!(collinear.bounding_box().y.size() >= Aabb::MIN_EXTENT);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new_simple(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(cast(&xy_triangle(), &ray).is_none());
    }
}
