use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH.
///
/// Stored as one [`Interval`] per axis. Boxes built through [`Aabb::new`] or
/// [`Aabb::from_points`] never have a side thinner than [`Aabb::MIN_EXTENT`],
/// so flat geometry (quads, axis-aligned triangles) still has a slab with
/// non-zero width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Minimum side length after padding.
    pub const MIN_EXTENT: f32 = 0.0001;

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanned by two extremal points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Union of two boxes. No padding is applied; both inputs already satisfy it.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            1 => self.y,
            2 => self.z,
            _ => self.x,
        }
    }

    /// Slab test against the parametric range `ray_t`.
    ///
    /// A zero direction component yields an infinite inverse; the slab then
    /// either accepts every `t` or rejects the ray, which is the intended result.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let orig = r.origin[axis];

            let mut t0 = (slab.min - orig) * adinv;
            let mut t1 = (slab.max - orig) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > ray_t.min {
                ray_t.min = t0;
            }
            if t1 < ray_t.max {
                ray_t.max = t1;
            }

            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    fn pad_to_minimums(&mut self) {
        let delta = Self::MIN_EXTENT;
        self.x = pad_interval(self.x, delta);
        self.y = pad_interval(self.y, delta);
        self.z = pad_interval(self.z, delta);
    }

    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Index of the axis with the greatest extent.
    ///
    /// X only wins when strictly larger than both Y and Z; a Y/Z tie goes to Z.
    /// BVH split order depends on this exact tie-break.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    pub fn min_point(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max_point(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }
}

/// Widens `iv` to at least `delta`. `expand` alone can round part of the pad
/// away in f32, so the ends are stepped outward one ulp at a time until the
/// size holds.
fn pad_interval(iv: Interval, delta: f32) -> Interval {
    if iv.size() >= delta {
        return iv;
    }
    let mut padded = iv.expand(delta);
    while padded.size() < delta && padded.min.is_finite() && padded.max.is_finite() {
        padded.min = next_down(padded.min);
        padded.max = next_up(padded.max);
    }
    padded
}

fn next_up(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        x
    } else if x == 0.0 {
        f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() + 1)
    } else {
        f32::from_bits(x.to_bits() - 1)
    }
}

fn next_down(x: f32) -> f32 {
    -next_up(-x)
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
