use clap::{Parser, ValueEnum};
use glint_renderer::DEFAULT_BUCKET_SIZE;
use std::path::PathBuf;

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Field of small random spheres (some moving) around three large ones
    RandomSpheres,
    /// Two large checker-textured spheres
    TwoSpheres,
    /// Globe textured from an image (earthmap.jpg)
    Earth,
    /// Ground and sphere with marble Perlin noise
    TwoPerlinSpheres,
    /// Five colored quads around the viewer
    Quads,
    /// Perlin spheres lit by a spherical and a rectangular light
    SimpleLight,
    /// Cornell box with two rotated blocks
    CornellBox,
    /// Cornell box with the blocks replaced by smoke
    CornellSmoke,
    /// Everything: boxes, volumes, textures, motion blur, instancing
    FinalScene,
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Offline CPU path tracer")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "final-scene")]
    pub scene: SceneKind,

    /// Image width in pixels (the scene's aspect ratio is kept)
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Seed for scene generation and pixel sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Output file; the format follows the extension (.png, .ppm, ...)
    #[arg(short, long, default_value = "image.png")]
    pub output: PathBuf,

    /// Render on the calling thread only
    #[arg(long)]
    pub single_threaded: bool,
}
