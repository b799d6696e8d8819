//! Sphere primitive, optionally moving during the shutter interval.

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use glint_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere whose center may travel linearly from `center0` to `center1`.
pub struct Sphere {
    center0: Vec3,
    center1: Vec3,
    /// Shutter window the motion is defined over
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// A stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::moving(center, center, radius, material)
    }

    /// A sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center0,
            center1,
            time0: 0.0,
            time1: 1.0,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Map the motion onto a shutter window other than `[0, 1]`.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn is_moving(&self) -> bool {
        self.center0 != self.center1
    }

    /// Center at `time`, clamped to the shutter window.
    pub fn center_at(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if !self.is_moving() || span <= 0.0 {
            return self.center0;
        }
        let s = Interval::UNIT.clamp((time - self.time0) / span);
        self.center0 + s * (self.center1 - self.center0)
    }

    /// UV for a point on the unit sphere: `u` runs around Y from -X,
    /// `v` from the south pole to the north pole.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
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

    fn hit_t(sphere: &Sphere, ray: &Ray) -> Option<f32> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        sphere
            .hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
            .then_some(rec.t)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        let t = hit_t(&sphere, &ray).expect("ray should hit");
        assert!((t - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        assert!(hit_t(&sphere, &ray).is_none());
    }

    #[test]
    fn test_inside_hit_reports_back_face() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::new(0.0, 0.0, -5.0), Vec3::new(2.0, 0.0, -5.0), 0.5, grey());

        assert_eq!(sphere.center_at(0.0), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(sphere.center_at(0.5), Vec3::new(1.0, 0.0, -5.0));
        assert_eq!(sphere.center_at(1.0), Vec3::new(2.0, 0.0, -5.0));

        // Aimed at the end position: misses at time 0, hits at time 1
        let early = Ray::new(Vec3::new(2.0, 0.0, 0.0), -Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(2.0, 0.0, 0.0), -Vec3::Z, 1.0);
        assert!(hit_t(&sphere, &early).is_none());
        assert!(hit_t(&sphere, &late).is_some());

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.x, Interval::new(-0.5, 2.5));
    }

    #[test]
    fn test_shutter_window_normalizes_time() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 1.0, grey())
            .with_shutter(2.0, 4.0);

        assert_eq!(sphere.center_at(3.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(sphere.center_at(10.0), Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_sphere_uv_poles_and_seam() {
        let (_, v_south) = Sphere::get_sphere_uv(-Vec3::Y);
        let (_, v_north) = Sphere::get_sphere_uv(Vec3::Y);
        assert!(v_south.abs() < 1e-5);
        assert!((v_north - 1.0).abs() < 1e-5);

        let (u, v) = Sphere::get_sphere_uv(-Vec3::X);
        assert!(u.abs() < 1e-5 || (u - 1.0).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (u, _) = Sphere::get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
    }
}
