//! Planar parallelogram primitive and the closed box built from six of them.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::{Material, Ray};
use glint_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Parallelogram spanned by edges `u` and `v` from corner `q`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)`, projects plane offsets onto the (u, v) basis
    w: Vec3,
    normal: Vec3,
    /// Plane equation constant: `normal . p = d`
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    /// Planar coordinates `(alpha, beta)` of `p` if it lies inside the quad.
    fn interior(&self, p: Vec3) -> Option<(f32, f32)> {
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        (Interval::UNIT.contains(alpha) && Interval::UNIT.contains(beta)).then_some((alpha, beta))
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane (also rejects a degenerate quad with zero normal)
        if !(denom.abs() >= 1e-8) {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let p = ray.at(t);
        let Some((alpha, beta)) = self.interior(p) else {
            return false;
        };

        rec.t = t;
        rec.p = p;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed axis-aligned box with opposite corners `a` and `b`, as six quads.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}
