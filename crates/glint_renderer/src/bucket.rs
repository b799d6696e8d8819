//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each pixel seeds its own generator, so the
//! image is identical to a single-threaded render.

use crate::hittable::Hittable;
use crate::renderer::{pixel_rng, render_pixel, ImageBuffer, RenderConfig};
use crate::{Camera, Color};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering the image, sorted from the center outward.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(bucket_size as usize) {
        for x in (0..width).step_by(bucket_size as usize) {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
        }
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist_sq = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        dist_sq(a)
            .partial_cmp(&dist_sq(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order within the bucket
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy this bucket's pixels into their region of `image`.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let b = &self.bucket;
        for local_y in 0..b.height {
            for local_x in 0..b.width {
                let color = self.pixels[(local_y * b.width + local_x) as usize];
                image.set(b.x + local_x, b.y + local_y, color);
            }
        }
    }
}

/// Render a single bucket.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, world: &dyn Hittable, seed: u64) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let mut rng = pixel_rng(seed, x, y, camera.image_width);
            pixels.push(render_pixel(camera, world, x, y, &mut rng));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render every bucket on the rayon pool and assemble the image.
///
/// `camera` must already be initialized.
pub fn render_buckets(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    let total = buckets.len();
    let completed = AtomicUsize::new(0);

    log::debug!(
        "Rendering {} buckets of {}px on {} threads",
        total,
        config.bucket_size,
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, config.seed);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    image
}
