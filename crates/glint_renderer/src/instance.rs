//! Instancing wrappers that place an existing primitive in the world.
//!
//! Both wrappers move the incoming ray into the child's local frame, delegate
//! the intersection, and move the hit point and normal back. The child is
//! shared, so one prototype (a box, a whole BVH) can be placed many times.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use glint_math::{Aabb, Interval, Mat4, Mat4Ext, Quat, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Child geometry displaced by `offset`.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Child geometry rotated about an axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    /// Local-to-world rotation
    rotation: Quat,
    /// World-to-local rotation
    inv_rotation: Quat,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate `object` by `degrees` about `axis` (right-handed).
    pub fn new(object: Arc<dyn Hittable>, axis: Vec3, degrees: f32) -> Self {
        let rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        let bbox = Mat4::from_quat(rotation).transform_aabb(&object.bounding_box());

        log::trace!("Rotate: {degrees} deg about {axis:?}, world bbox {bbox:?}");

        Self {
            object,
            rotation,
            inv_rotation: rotation.inverse(),
            bbox,
        }
    }

    /// Rotation about the Y axis, the common case for scene layout.
    pub fn y(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Vec3::Y, degrees)
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let local_ray = Ray::new(
            self.inv_rotation * ray.origin(),
            self.inv_rotation * ray.direction(),
            ray.time(),
        );

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        // Rotation preserves dot products, so front_face stays valid.
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
