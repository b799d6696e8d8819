//! Demo scenes.
//!
//! Each builder returns the world (already wrapped in a BVH where it pays
//! off) together with the camera it was composed for.

use crate::cli::SceneKind;
use glint_renderer::{
    gen_f32, gen_range, make_box, random_vec3, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Quad, Rotate,
    Sphere, Texture, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const SKY: Color = Color::new(0.70, 0.80, 1.00);

pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
}

impl Scene {
    fn new(world: Arc<dyn Hittable>, camera: Camera) -> Self {
        Self { world, camera }
    }
}

/// Build `kind`. Randomized layouts are drawn from `seed`.
pub fn build(kind: SceneKind, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);

    let scene = match kind {
        SceneKind::RandomSpheres => random_spheres(&mut rng),
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::Earth => earth(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(),
        SceneKind::Quads => quads(),
        SceneKind::SimpleLight => simple_light(),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::FinalScene => final_scene(&mut rng),
    };

    log::info!("Built scene {:?}", kind);
    scene
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

fn random_spheres(rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(a as f32 + 0.9 * gen_f32(rng), 0.2, b as f32 + 0.9 * gen_f32(rng));

            // Keep clear of the large metal sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.7 {
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                world.add(Arc::new(Sphere::new(center, 0.2, lambertian(albedo))));
            } else if choose_mat < 0.92 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                let center2 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.4, 0.2, 0.1)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(SKY)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.8, 11.0);

    Scene::new(Arc::new(BvhNode::from_list(world)), camera)
}

fn two_spheres() -> Scene {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        0.8,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(SKY)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(Arc::new(world), camera)
}

fn earth() -> Scene {
    let earth_texture: Arc<dyn Texture> = Arc::new(ImageTexture::load("earthmap.jpg"));
    let globe = Sphere::new(Vec3::ZERO, 2.0, Arc::new(Lambertian::textured(earth_texture)));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(SKY)
        .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(Arc::new(globe), camera)
}

fn perlin_ground_and_sphere(world: &mut HittableList) {
    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(pertext));

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, material.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, material)));
}

fn two_perlin_spheres() -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_sphere(&mut world);

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(SKY)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(Arc::new(world), camera)
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lambertian(Color::new(0.2, 0.8, 0.8));

    let sides = [
        (Vec3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), left_red),
        (Vec3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), back_green),
        (Vec3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), right_blue),
        (Vec3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), upper_orange),
        (Vec3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), lower_teal),
    ];
    for (q, u, v, material) in sides {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }

    let camera = Camera::new()
        .with_aspect_ratio(1.0, 400)
        .with_quality(100, 50)
        .with_background(SKY)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);

    Scene::new(Arc::new(world), camera)
}

fn simple_light() -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_sphere(&mut world);

    let difflight: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(4.0, 4.0, 4.0)));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, difflight.clone())));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        difflight,
    )));

    let camera = Camera::new()
        .with_aspect_ratio(1.0, 400)
        .with_quality(100, 50)
        .with_background(Color::ZERO)
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(Arc::new(world), camera)
}

/// Five walls and the ceiling light of the Cornell box.
fn cornell_walls(world: &mut HittableList) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(7.0, 7.0, 7.0)));

    let walls = [
        (Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red),
        (Vec3::new(113.0, 554.0, 127.0), Vec3::new(330.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 305.0), light),
        (Vec3::new(0.0, 555.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white),
    ];
    for (q, u, v, material) in walls {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }
}

/// The tall and the short block, rotated and placed on the floor.
fn cornell_blocks() -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let white = lambertian(Color::new(0.73, 0.73, 0.73));

    let tall = Arc::new(make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()));
    let tall: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(Rotate::y(tall, 15.0)), Vec3::new(265.0, 0.0, 295.0)));

    let short = Arc::new(make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white));
    let short: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(Rotate::y(short, -18.0)), Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_aspect_ratio(1.0, 600)
        .with_quality(200, 50)
        .with_background(Color::ZERO)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(&mut world);

    let (tall, short) = cornell_blocks();
    world.add(tall);
    world.add(short);

    Scene::new(Arc::new(world), cornell_camera())
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(&mut world);

    let (tall, short) = cornell_blocks();
    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    world.add(Arc::new(ConstantMedium::new(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::with_texture(short, 0.01, pertext)));

    Scene::new(Arc::new(BvhNode::from_list(world)), cornell_camera())
}

/// Small spheres packed into a 165-unit cube, each with its own over-bright albedo.
fn foam_balls(rng: &mut StdRng, count: usize) -> HittableList {
    let mut balls = HittableList::new();
    for _ in 0..count {
        let albedo = random_vec3(rng, 0.63, 1.5);
        balls.add(Arc::new(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, lambertian(albedo))));
    }
    balls
}

fn final_scene(rng: &mut StdRng) -> Scene {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let mut boxes1 = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range(rng, 1.0, 101.0);

            boxes1.add(Arc::new(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::from_list(boxes1)));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(8.5, 7.0, 7.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light,
    )));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(Sphere::moving(center1, center2, 50.0, lambertian(Color::new(0.7, 0.3, 0.1)))));

    world.add(Arc::new(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::new(boundary, 0.2, Color::new(0.2, 0.4, 0.9))));

    // Thin haze over everything
    let haze: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5))));
    world.add(Arc::new(ConstantMedium::new(haze, 0.0001, Color::ONE)));

    let earth_texture: Arc<dyn Texture> = Arc::new(ImageTexture::load("earthmap.jpg"));
    world.add(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::textured(earth_texture)),
    )));

    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(0.1));
    world.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::textured(pertext)),
    )));

    world.add(Arc::new(Translate::new(
        Arc::new(Rotate::y(Arc::new(BvhNode::from_list(foam_balls(rng, 1000))), 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    let camera = Camera::new()
        .with_aspect_ratio(1.0, 400)
        .with_quality(250, 4)
        .with_background(Color::ZERO)
        .with_position(Vec3::new(478.0, 278.0, -600.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.1, 10.0);

    Scene::new(Arc::new(world), camera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;
    use glint_renderer::{render, HitRecord, Interval, Ray, RenderConfig};

    #[test]
    fn test_every_scene_builds_with_valid_camera() {
        for &kind in SceneKind::value_variants() {
            let mut scene = build(kind, 0);
            scene.camera.initialize().unwrap();

            let bbox = scene.world.bounding_box();
            assert!(bbox.x.size() > 0.0, "{kind:?} has an empty world");
        }
    }

    #[test]
    fn test_random_layout_follows_seed() {
        let a = build(SceneKind::RandomSpheres, 3).world.bounding_box();
        let b = build(SceneKind::RandomSpheres, 3).world.bounding_box();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cornell_box_is_closed_from_inside() {
        let scene = build(SceneKind::CornellBox, 0);
        let bbox = scene.world.bounding_box();

        assert!(bbox.x.min <= 0.0 && bbox.x.max >= 555.0);
        assert!(Interval::new(-1.0, 556.0).contains(bbox.y.max));
    }

    #[test]
    fn test_tiny_cornell_render_has_light() {
        let mut scene = build(SceneKind::CornellBox, 0);
        scene.camera = scene.camera.with_aspect_ratio(1.0, 16).with_quality(2, 4);

        let image = render(&mut scene.camera, scene.world.as_ref(), &RenderConfig::default()).unwrap();
        assert_eq!((image.width(), image.height()), (16, 16));
        assert!(image.pixels().iter().any(|c| c.length() > 0.0));
    }

    #[test]
    fn test_foam_balls_carry_their_own_albedo() {
        let mut rng = StdRng::seed_from_u64(11);
        let balls = foam_balls(&mut rng, 8);
        assert_eq!(balls.len(), 8);

        let mut albedos = Vec::new();
        for ball in balls.objects() {
            let center = ball.bounding_box().centroid();
            let ray = Ray::new_simple(center - Vec3::new(0.0, 0.0, 50.0), Vec3::Z);
            let mut rec = HitRecord::default();
            assert!(ball.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));

            let scatter = rec.material.scatter(&ray, &rec, &mut rng).unwrap();
            let a = scatter.attenuation;
            assert!(a.min_element() >= 0.63 && a.max_element() < 1.5, "albedo {a:?}");
            albedos.push(a);
        }

        assert!(albedos.windows(2).any(|w| w[0] != w[1]));
    }
}
