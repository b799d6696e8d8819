use anyhow::{Context, Result};
use clap::Parser;
use glint_renderer::{render, ImageBuffer, RenderConfig};
use std::path::Path;

mod cli;
mod scenes;

use cli::Args;
use scenes::Scene;

/// Encode `image` as 8-bit RGB; the format follows the file extension.
fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(image.width(), image.height(), image.to_rgb8())
        .context("pixel buffer does not match image dimensions")?;

    rgb.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Applies the command-line width, sample and depth overrides to the scene camera.
fn apply_overrides(scene: &mut Scene, args: &Args) {
    if let Some(width) = args.width {
        let aspect = scene.camera.aspect_ratio;
        scene.camera = scene.camera.clone().with_aspect_ratio(aspect, width);
    }
    if let Some(samples) = args.samples {
        scene.camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        scene.camera.max_depth = depth;
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting Glint: {:?}", args.scene);

    let mut scene = scenes::build(args.scene, args.seed);

    apply_overrides(&mut scene, &args);

    let config = RenderConfig {
        seed: args.seed,
        bucket_size: args.bucket_size,
        parallel: !args.single_threaded,
    };

    let image = render(&mut scene.camera, scene.world.as_ref(), &config).context("Render failed")?;

    save_image(&image, &args.output)
}
