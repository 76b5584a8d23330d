use criterion::{criterion_group, criterion_main};

use paroctree_rs::octree::{BoundingBox, Octree, Ray, V3c};
use rand::Rng;

fn criterion_benchmark(c: &mut criterion::Criterion) {
    let mut rng = rand::thread_rng();
    let tree_size = 512.;
    let max_depth = 8;
    let mut tree: Octree<u32> = Octree::new(
        BoundingBox::new(V3c::unit(0.), V3c::unit(tree_size)),
        max_depth,
    )
    .ok()
    .unwrap();
    for i in 0..100000 {
        tree.insert_at(
            &V3c::new(
                rng.gen_range(0.0..tree_size),
                rng.gen_range(0.0..(tree_size / 4.)),
                rng.gen_range(0.0..tree_size),
            ),
            max_depth,
            i,
        )
        .ok()
        .unwrap();
    }

    // Rays from a camera above the tree, looking at its center
    let viewport_size_width = 64;
    let viewport_size_height = 64;
    let radius = 2. * tree_size;
    let angle: f32 = 40.;
    let origin = V3c::new(angle.sin() * radius, radius, angle.cos() * radius);
    let direction = (V3c::unit(tree_size / 2.) - origin).normalized();
    let viewport_up_direction = V3c::new(0., 1., 0.);
    let viewport_right_direction = viewport_up_direction.cross(direction).normalized();
    let viewport_width = 4.;
    let viewport_height = 4.;
    let viewport_fov = 3.;
    let pixel_width = viewport_width / viewport_size_width as f32;
    let pixel_height = viewport_height / viewport_size_height as f32;
    let viewport_bottom_left = origin + (direction * viewport_fov)
        - (viewport_up_direction * (viewport_height / 2.))
        - (viewport_right_direction * (viewport_width / 2.));
    let mut rays = Vec::with_capacity(viewport_size_width * viewport_size_height);
    for y in 0..viewport_size_height {
        for x in 0..viewport_size_width {
            let glass_point = viewport_bottom_left
                + viewport_right_direction * x as f32 * pixel_width
                + viewport_up_direction * y as f32 * pixel_height;
            rays.push(Ray {
                origin,
                direction: (glass_point - origin).normalized() * (4. * tree_size),
            });
        }
    }

    c.bench_function("cpu get_by_ray", |b| {
        b.iter(|| {
            for ray in rays.iter() {
                criterion::black_box(tree.get_by_ray(ray));
            }
        })
    });

    c.bench_function("cpu raymarch occupied", |b| {
        b.iter(|| {
            for ray in rays.iter() {
                criterion::black_box(tree.raymarch(ray).count());
            }
        })
    });

    c.bench_function("cpu raymarch geometric", |b| {
        b.iter(|| {
            for ray in rays.iter() {
                criterion::black_box(tree.raymarch_geometric(ray).count());
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
