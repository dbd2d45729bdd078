//! Click-picking style example.
//!
//! Builds a small scene (a quad mesh, an emissive quad and a sphere),
//! fires a grid of rays at it like a screen-space picking pass, and
//! draws a few area-weighted light samples.

use glint_accel::{
    BvhTree, Material, Mesh, Primitive, Ray, SplitMethod, Sphere, Vec2, Vec3,
};
use glint_math::Mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn main() {
    env_logger::init();

    println!("Glint acceleration - picking example");
    println!("====================================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!(
        "Scene built in {:?} ({} top-level primitives)",
        start.elapsed(),
        scene.primitive_count()
    );

    // Fire a 5x5 grid of rays from the "camera" at z = 10
    for y in 0..5 {
        for x in 0..5 {
            let px = -4.0 + 2.0 * x as f32;
            let py = -4.0 + 2.0 * y as f32;
            let ray = Ray::new(Vec3::new(px, py, 10.0), Vec3::new(0.0, 0.0, -1.0));

            let isect = scene.intersect(&ray);
            if isect.hit {
                println!(
                    "pick ({px:5.1}, {py:5.1}) -> hit at {:?}, distance {:.3}, emissive: {}",
                    isect.point,
                    isect.distance,
                    isect.has_emission()
                );
            } else {
                println!("pick ({px:5.1}, {py:5.1}) -> miss");
            }
        }
    }

    // Area-weighted light samples, the way a path tracer would pick
    // points on scene surfaces
    let mut rng = StdRng::seed_from_u64(1);
    println!("\nSurface samples (pdf = 1 / total area = {:.5}):", 1.0 / scene.total_area());
    for _ in 0..5 {
        let (pos, pdf) = scene.sample(&mut rng);
        println!("  point {:?}, normal {:?}, pdf {:.5}", pos.point, pos.normal, pdf);
    }

    // Walk the tree the way the debug wireframe pass does
    let mut nodes = 0usize;
    let mut max_depth = 0usize;
    if let Some(root) = scene.root() {
        root.visit(&mut |_, depth| {
            nodes += 1;
            max_depth = max_depth.max(depth);
        });
    }
    println!("\nTree: {nodes} nodes, max depth {max_depth}");
}

fn build_scene() -> BvhTree {
    let quad_positions = [
        Vec3::new(-4.0, -4.0, 0.0),
        Vec3::new(4.0, -4.0, 0.0),
        Vec3::new(4.0, 4.0, 0.0),
        Vec3::new(-4.0, 4.0, 0.0),
    ];
    let quad_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let quad_indices = [0u32, 1, 2, 2, 3, 0];

    let floor = Mesh::new(
        &quad_positions,
        Some(&quad_uvs),
        &quad_indices,
        &Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0)),
        Arc::new(Material::new(Vec3::splat(0.7))),
        SplitMethod::Median,
    );

    let lamp = Mesh::new(
        &quad_positions,
        Some(&quad_uvs),
        &quad_indices,
        &Mat4::from_translation(Vec3::new(0.0, 0.0, -9.0)),
        Arc::new(Material::emissive(Vec3::ONE, Vec3::splat(12.0))),
        SplitMethod::Median,
    );

    let ball = Sphere::new(
        Vec3::new(1.0, 1.0, -3.0),
        1.0,
        Arc::new(Material::new(Vec3::new(0.8, 0.3, 0.2))),
    );

    let primitives: Vec<Primitive> = vec![Arc::new(floor), Arc::new(lamp), Arc::new(ball)];
    BvhTree::build(primitives, 1, SplitMethod::Median)
}
