//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built once by median split: the objects are ordered along the
//! longest axis of their combined box (by each box's minimum on that axis)
//! and halved until single objects remain.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Ray;
use glint_math::{Aabb, Interval};
use rand::RngCore;
use std::cmp::Ordering;
use std::sync::Arc;

/// BVH node - a branch with exactly two children, or a single-object leaf.
pub enum BvhNode {
    /// Internal node; `bbox` is the union of both children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Built from an empty collection; never hit.
    Empty,
}

/// Size statistics of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub leaves: usize,
    pub branches: usize,
    pub max_depth: usize,
}

impl BvhNode {
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let node = Self::build(objects);

        let stats = node.stats();
        log::debug!(
            "Built BVH over {} objects: {} branches, {} leaves, depth {}",
            count,
            stats.branches,
            stats.leaves,
            stats.max_depth
        );

        node
    }

    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        let axis = bbox.longest_axis();
        let comparator = |a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>| box_compare(a, b, axis);

        match objects.len() {
            1 => {
                let object = objects.remove(0);
                BvhNode::Leaf {
                    bbox: object.bounding_box(),
                    object,
                }
            }
            2 => {
                if comparator(&objects[1], &objects[0]) == Ordering::Less {
                    objects.swap(0, 1);
                }
                let right = objects.remove(1);
                let left = objects.remove(0);
                Self::branch(Self::leaf(left), Self::leaf(right))
            }
            n => {
                // Stable sort keeps equal keys in input order, so builds are deterministic.
                objects.sort_by(comparator);

                let right_objects = objects.split_off(n / 2);
                let left = Self::build(objects);
                let right = Self::build(right_objects);
                Self::branch(left, right)
            }
        }
    }

    fn leaf(object: Arc<dyn Hittable>) -> Self {
        BvhNode::Leaf {
            bbox: object.bounding_box(),
            object,
        }
    }

    fn branch(left: BvhNode, right: BvhNode) -> Self {
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    pub fn stats(&self) -> BvhStats {
        match self {
            BvhNode::Empty => BvhStats::default(),
            BvhNode::Leaf { .. } => BvhStats {
                leaves: 1,
                branches: 0,
                max_depth: 1,
            },
            BvhNode::Branch { left, right, .. } => {
                let l = left.stats();
                let r = right.stats();
                BvhStats {
                    leaves: l.leaves + r.leaves,
                    branches: l.branches + r.branches + 1,
                    max_depth: l.max_depth.max(r.max_depth) + 1,
                }
            }
        }
    }
}

fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => {
                bbox.hit(ray, ray_t) && object.hit(ray, ray_t, rec, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // Only check right up to the closest hit so far
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range, random_unit_vector, random_vec3};
    use crate::texture::CheckerTexture;
    use crate::{Color, Lambertian, Material, Quad, Sphere, Triangle};
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn nearest_t(world: &dyn Hittable, ray: &Ray, rng: &mut StdRng) -> Option<f32> {
        let mut rec = HitRecord::default();
        world
            .hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng)
            .then_some(rec.t)
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        assert!(nearest_t(&bvh, &ray, &mut rng).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()));
        let bvh = BvhNode::new(vec![sphere]);

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let t = nearest_t(&bvh, &ray, &mut rng).expect("ray should hit");
        assert!((t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_two_objects_ordered_along_longest_axis() {
        let far: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(10.0, 0.0, 0.0), 1.0, grey()));
        let near: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(-10.0, 0.0, 0.0), 1.0, grey()));
        let bvh = BvhNode::new(vec![far, near]);

        let BvhNode::Branch { left, right, bbox } = &bvh else {
            panic!("two objects should build a branch");
        };
        assert_eq!(left.bounding_box().x, Interval::new(-11.0, -9.0));
        assert_eq!(right.bounding_box().x, Interval::new(9.0, 11.0));
        assert_eq!(bbox.x, Interval::new(-11.0, 11.0));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, grey())) as Arc<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);
        let stats = bvh.stats();
        assert_eq!(stats.leaves, 10);
        assert_eq!(stats.branches, 9);
        assert!(stats.max_depth <= 5);

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        let t = nearest_t(&bvh, &ray, &mut rng).expect("ray should hit");

        // Sphere at z=-5 with radius 0.5
        assert!((t - 4.5).abs() < 0.01);
    }

    #[test]
    fn test_branch_box_contains_children() {
        let mut rng = StdRng::seed_from_u64(9);
        let objects: Vec<Arc<dyn Hittable>> = (0..50)
            .map(|_| {
                let c = random_vec3(&mut rng, -20.0, 20.0);
                Arc::new(Sphere::new(c, gen_range(&mut rng, 0.1, 2.0), grey())) as Arc<dyn Hittable>
            })
            .collect();
        let bvh = BvhNode::new(objects);

        fn check(node: &BvhNode) {
            if let BvhNode::Branch { left, right, bbox } = node {
                for child in [left.bounding_box(), right.bounding_box()] {
                    for axis in 0..3 {
                        let (outer, inner) = (bbox.axis_interval(axis), child.axis_interval(axis));
                        assert!(outer.min <= inner.min && inner.max <= outer.max);
                    }
                }
                check(left);
                check(right);
            }
        }
        check(&bvh);
    }

    #[test]
    fn test_bvh_matches_brute_force_on_mixed_scene() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut list = HittableList::new();

        for _ in 0..40 {
            let c = random_vec3(&mut rng, -10.0, 10.0);
            list.add(Arc::new(Sphere::new(c, gen_range(&mut rng, 0.2, 1.5), grey())));
        }
        for _ in 0..20 {
            let q = random_vec3(&mut rng, -10.0, 10.0);
            let u = random_vec3(&mut rng, -2.0, 2.0);
            let v = random_vec3(&mut rng, -2.0, 2.0);
            list.add(Arc::new(Quad::new(q, u, v, grey())));
        }
        for _ in 0..20 {
            let p0 = random_vec3(&mut rng, -10.0, 10.0);
            let p1 = p0 + random_vec3(&mut rng, -2.0, 2.0);
            let p2 = p0 + random_vec3(&mut rng, -2.0, 2.0);
            list.add(Arc::new(Triangle::new(p0, p1, p2, grey())));
        }

        let bvh = BvhNode::new(list.objects().to_vec());

        for _ in 0..1000 {
            let origin = random_vec3(&mut rng, -15.0, 15.0);
            let ray = Ray::new_simple(origin, random_unit_vector(&mut rng));

            let brute = nearest_t(&list, &ray, &mut rng);
            let accel = nearest_t(&bvh, &ray, &mut rng);
            assert_eq!(brute, accel, "ray {ray:?}");
        }
    }

    #[test]
    fn test_two_checker_spheres_bvh_matches_aggregate() {
        let checker = Arc::new(CheckerTexture::from_colors(
            0.8,
            Color::new(0.2, 0.3, 0.1),
            Color::new(0.9, 0.9, 0.9),
        ));
        let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker));

        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)));

        let bvh = BvhNode::new(list.objects().to_vec());
        let mut rng = StdRng::seed_from_u64(2);
        let mut hits = 0;

        for _ in 0..1000 {
            let origin = random_vec3(&mut rng, -30.0, 30.0);
            let ray = Ray::new_simple(origin, random_unit_vector(&mut rng));

            let brute = nearest_t(&list, &ray, &mut rng);
            let accel = nearest_t(&bvh, &ray, &mut rng);
            assert_eq!(brute, accel, "ray {ray:?}");
            hits += usize::from(accel.is_some());
        }

        assert!(hits > 0, "at least some random rays should hit the spheres");
    }
}
