//! Textures: spatially varying colors sampled at a hit point.

use crate::image_data::{load_image, ImageData};
use crate::perlin::Perlin;
use crate::Color;
use glint_math::{Interval, Vec3};
use std::sync::Arc;

/// Color lookup from surface coordinates `(u, v)` and world point `p`.
///
/// Implementations must be pure: the same inputs always give the same color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3-D checkerboard of cubic cells alternating between two textures.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one cell in world units.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// How a [`NoiseTexture`] turns Perlin noise into a gray level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoiseStyle {
    /// Raw noise remapped to `[0, 1]`
    Smooth,
    /// Multi-octave turbulence
    Turbulence,
    /// Sine bands along Z phase-shifted by turbulence
    #[default]
    Marble,
}

const TURBULENCE_DEPTH: u32 = 7;

/// Procedural gray texture driven by Perlin noise.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    style: NoiseStyle,
}

impl NoiseTexture {
    /// Marble pattern at frequency `scale`.
    pub fn new(scale: f32) -> Self {
        Self::with_style(scale, NoiseStyle::default())
    }

    pub fn with_style(scale: f32, style: NoiseStyle) -> Self {
        Self {
            noise: Perlin::new(),
            scale,
            style,
        }
    }

    pub fn with_perlin(noise: Perlin, scale: f32, style: NoiseStyle) -> Self {
        Self { noise, scale, style }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let gray = match self.style {
            NoiseStyle::Smooth => 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseStyle::Turbulence => self.noise.turbulence(self.scale * p, TURBULENCE_DEPTH),
            NoiseStyle::Marble => {
                0.5 * (1.0 + (self.scale * p.z + 10.0 * self.noise.turbulence(p, TURBULENCE_DEPTH)).sin())
            }
        };

        Color::ONE * gray
    }
}

/// Texture sampled from an RGB8 image by `(u, v)`, nearest pixel.
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    pub fn new(image: ImageData) -> Self {
        Self { image }
    }

    /// Load `name` through the image search path; a missing file renders magenta.
    pub fn load(name: &str) -> Self {
        Self::new(load_image(name))
    }

    /// Shown where no image data is available.
    pub const MISSING: Color = Color::new(1.0, 0.0, 1.0);
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.height() == 0 {
            return Self::MISSING;
        }

        // Flip V to image coordinates (row 0 is the top)
        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;

        let Some(pixel) = self.image.pixel(i, j) else {
            return Self::MISSING;
        };

        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * pixel[0] as f32,
            color_scale * pixel[1] as f32,
            color_scale * pixel[2] as f32,
        )
    }
}
