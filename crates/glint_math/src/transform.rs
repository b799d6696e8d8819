// Bounding-box helpers for affine transforms.
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 used by the instancing wrappers.
pub trait Mat4Ext {
    /// Box enclosing all 8 transformed corners of `aabb`.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let lo = aabb.min_point();
        let hi = aabb.max_point();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Vec3::new(
                        if i == 0 { lo.x } else { hi.x },
                        if j == 0 { lo.y } else { hi.y },
                        if k == 0 { lo.z } else { hi.z },
                    );
                    let p = self.transform_point3(corner);
                    result_min = result_min.min(p);
                    result_max = result_max.max(p);
                }
            }
        }

        Aabb::from_points(result_min, result_max)
    }
}
