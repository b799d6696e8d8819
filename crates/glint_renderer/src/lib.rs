//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for offline rendering: spheres, quads,
//! triangles and volumes behind a BVH, textured materials, a thin-lens
//! camera, and bucket-parallel image rendering that is reproducible from
//! a single seed.

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod image_data;
mod instance;
mod material;
mod medium;
mod perlin;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhNode, BvhStats};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_data::{load_image, try_load_image, ImageData, ImageError, IMAGE_DIR_ENV};
pub use instance::{Rotate, Translate};
pub use material::{reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, pixel_rng, ray_color, render, render_pixel, render_sequential, ImageBuffer,
    RenderConfig,
};
pub use sampling::{gen_f32, gen_range, random_in_unit_disk, random_unit_vector, random_vec3, sample_square};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseStyle, NoiseTexture, SolidColor, Texture};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec3};
