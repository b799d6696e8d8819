//! Three spheres on a ground plane, written as plain-text PPM to stdout.
//!
//! cargo run --release --example simple_render > spheres.ppm

use glint_renderer::{
    render, BvhNode, Camera, Color, Dielectric, HittableList, Lambertian, Metal, RenderConfig, Sphere, Vec3,
};
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

fn build_scene() -> BvhNode {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    BvhNode::from_list(world)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let world = build_scene();

    let mut camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(50, 10)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    let image = render(&mut camera, &world, &RenderConfig::default())?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "P3\n{} {}\n255", image.width(), image.height())?;
    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(out, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }
    out.flush()?;

    Ok(())
}
