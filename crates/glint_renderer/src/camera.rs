//! Camera for ray generation.

use crate::error::{RenderError, RenderResult};
use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::{Color, Ray};
use glint_math::Vec3;
use rand::RngCore;

/// Thin-lens perspective camera.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before generating rays. Defaults: 16:9 at 400 px wide, 10 samples,
/// depth 10, 90 deg vertical fov, looking from the origin down -Z, pinhole,
/// black background.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,
    /// Derived from width and aspect by `initialize()`
    pub image_height: u32,
    fixed_height: Option<u32>,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Cone angle of rays through each pixel, in degrees
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    /// Radiance returned for rays that escape the scene
    pub background: Color,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            image_height: 225,
            fixed_height: None,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Color::ZERO,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
        }
    }

    /// Set image width and aspect ratio; the height follows.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self.fixed_height = None;
        self
    }

    /// Set an exact pixel resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.fixed_height = Some(height);
        self.aspect_ratio = width as f32 / height.max(1) as f32;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. A `defocus_angle` of zero gives a pinhole camera.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Validate the settings and derive the viewport. Must be called before
    /// generating rays.
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.image_width == 0 {
            return Err(RenderError::InvalidConfig("image_width must be at least 1".into()));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples_per_pixel must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max_depth must be at least 1".into()));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "vfov must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "focus_dist must be positive, got {}",
                self.focus_dist
            )));
        }

        self.image_height = match self.fixed_height {
            Some(height) if height > 0 => height,
            _ => ((self.image_width as f32 / self.aspect_ratio) as u32).max(1),
        };
        self.samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize_or_zero();
        let u = self.vup.cross(w).normalize_or_zero();
        if w == Vec3::ZERO || u == Vec3::ZERO {
            return Err(RenderError::InvalidConfig(
                "look_from, look_at and vup do not define a camera basis".into(),
            ));
        }
        self.w = w;
        self.u = u;
        self.v = w.cross(u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera: {}x{} @ {} spp, depth {}, vfov {}",
            self.image_width,
            self.image_height,
            self.samples_per_pixel,
            self.max_depth,
            self.vfov
        );

        Ok(())
    }

    /// Generate a ray for pixel (i, j), jittered within the pixel and across
    /// the lens, at a random time in the shutter interval.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// 1 / samples_per_pixel
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::{HitRecord, Hittable};
    use crate::{Lambertian, Sphere};
    use glint_math::Interval;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn looking_at_origin() -> Camera {
        Camera::new()
            .with_aspect_ratio(16.0 / 9.0, 160)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 5.0)
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize().unwrap();

        assert_eq!(camera.image_height, 600);
        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
        assert!((camera.v - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_image_height_from_aspect() {
        let mut camera = Camera::new().with_aspect_ratio(16.0 / 9.0, 400);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height, 225);

        // Very wide images still get one row
        let mut camera = Camera::new().with_aspect_ratio(1000.0, 10);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height, 1);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let bad = [
            Camera::new().with_aspect_ratio(16.0 / 9.0, 0),
            Camera::new().with_quality(0, 10),
            Camera::new().with_quality(10, 0),
            Camera::new().with_aspect_ratio(-1.0, 100),
            Camera::new().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y),
            Camera::new().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y),
            Camera::new().with_lens(0.0, 0.0, 1.0),
        ];

        for mut camera in bad {
            assert!(matches!(camera.initialize(), Err(RenderError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = looking_at_origin();
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(camera.image_width / 2, camera.image_height / 2, &mut rng);
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, 5.0));

        let dir = ray.direction().normalize();
        assert!(dir.z < -0.99, "center ray direction {dir:?}");
        assert!((0.0..1.0).contains(&ray.time()));
    }

    #[test]
    fn test_corner_rays_span_the_viewport() {
        let mut camera = looking_at_origin();
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let top_left = camera.get_ray(0, 0, &mut rng).direction();
        let bottom_right = camera
            .get_ray(camera.image_width - 1, camera.image_height - 1, &mut rng)
            .direction();

        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn test_defocus_origins_lie_on_lens_disk() {
        let mut camera = looking_at_origin().with_lens(40.0, 10.0, 5.0);
        camera.initialize().unwrap();
        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(3);

        let mut moved = false;
        for _ in 0..200 {
            let ray = camera.get_ray(80, 45, &mut rng);
            let offset = ray.origin() - camera.center();
            assert!(offset.z.abs() < 1e-5);
            assert!(offset.length() <= radius + 1e-5);
            moved |= offset.length() > 1e-4;
        }
        assert!(moved);
    }

    #[test]
    fn test_ground_sphere_scenario() {
        let ground = Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        );
        let mut camera = looking_at_origin();
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let t = Interval::new(0.001, f32::INFINITY);

        // The center pixel sits just below the horizon line
        let center = camera.get_ray(camera.image_width / 2, camera.image_height / 2, &mut rng);
        let mut rec = HitRecord::default();
        assert!(ground.hit(&center, t, &mut rec, &mut rng));
        assert!(rec.t > 0.0);
        assert!(rec.front_face);

        let bottom = camera.get_ray(camera.image_width / 2, camera.image_height - 1, &mut rng);
        let mut near = HitRecord::default();
        assert!(ground.hit(&bottom, t, &mut near, &mut rng));
        assert!(near.t < rec.t);

        // The top row looks above the horizon
        let up = camera.get_ray(camera.image_width / 2, 0, &mut rng);
        let mut rec = HitRecord::default();
        assert!(!ground.hit(&up, t, &mut rec, &mut rng));
    }
}
