//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emission from lights and a constant background for escaped rays
//! - Anti-aliasing via multi-sampling
//! - Gamma correction on output

use crate::bucket::{render_buckets, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::{Camera, Color, Ray};
use glint_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Instant;

/// Secondary rays start this far along the ray to avoid self-intersection.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base seed; every pixel derives its own generator from it
    pub seed: u64,
    /// Edge length of a bucket (tile) in pixels
    pub bucket_size: u32,
    /// Render buckets on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            parallel: true,
        }
    }
}

/// Generator for pixel `(x, y)`. Depends only on the seed and the pixel,
/// never on which thread or bucket renders it.
pub fn pixel_rng(seed: u64, x: u32, y: u32, width: u32) -> StdRng {
    let pixel_index = y as u64 * width as u64 + x as u64;
    StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ pixel_index)
}

/// Compute the radiance carried back along `ray`.
///
/// `depth` counts the bounces still allowed; at zero no more light is gathered.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), &mut rec, rng) {
        return background;
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-encode a linear color and quantize it to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let quantize = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Average of `samples_per_pixel` traced samples for pixel `(x, y)`, in linear space.
pub fn render_pixel(camera: &Camera, world: &dyn Hittable, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Linear color image, row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> RenderResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(RenderError::BufferSize {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Gamma-encoded 8-bit RGB bytes, ready for an image encoder.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Render one scanline after another on the calling thread.
pub fn render_sequential(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let mut rng = pixel_rng(seed, x, y, camera.image_width);
            let color = render_pixel(camera, world, x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the entire scene to an image buffer.
///
/// Initializes the camera first, so builder settings are validated here.
/// The result does not depend on `config.parallel` or `config.bucket_size`.
pub fn render(camera: &mut Camera, world: &dyn Hittable, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    camera.initialize()?;

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} ({})",
        camera.image_width,
        camera.image_height,
        camera.samples_per_pixel,
        camera.max_depth,
        if config.parallel { "parallel" } else { "single-threaded" }
    );

    let start = Instant::now();

    let image = if config.parallel {
        render_buckets(camera, world, config)
    } else {
        render_sequential(camera, world, config.seed)
    };

    log::info!("Render complete in {:.2}s", start.elapsed().as_secs_f32());

    Ok(image)
}
