//! Framing and picking benchmarks.

use atrium::camera::Camera;
use atrium::framing::ModelFramer;
use atrium::manifest::PointDescriptor;
use atrium::model::{Mesh, MeshNode, Model};
use atrium::options::{CameraOptions, InteractionOptions, Options};
use atrium::points::InteractivePointSet;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Mat4;

fn sphere_model(segments: u32) -> Model {
    Model::new(
        "bench",
        vec![MeshNode {
            mesh: Mesh::uv_sphere(250.0, segments, segments / 2),
            local: Mat4::from_translation(glam::Vec3::new(40.0, 10.0, -5.0)),
            color: [0.8, 0.7, 0.6],
            opacity: 1.0,
        }],
    )
}

fn framing_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let framer = ModelFramer::new(&options.framing, &options.skybox);
    let mut group = c.benchmark_group("frame_model");

    for segments in [32, 128, 512] {
        let model = sphere_model(segments);
        group.bench_function(format!("{segments}_segments"), |b| {
            b.iter_batched(
                || model.clone(),
                |mut model| black_box(framer.frame(&mut model)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn picking_benchmark(c: &mut Criterion) {
    let camera = Camera::from_options(&CameraOptions::default(), 16.0 / 9.0);
    let ray = camera.ray_from_ndc(0.1, -0.2);
    let mut group = c.benchmark_group("pick_point");

    for count in [5, 50, 500] {
        let descriptors: Vec<PointDescriptor> = (0..count)
            .map(|i| PointDescriptor {
                position: [i as f32 * 0.1, 0.5, -(i as f32) * 0.05],
                label: format!("point {i}"),
                info: String::new(),
            })
            .collect();
        let mut points = InteractivePointSet::new(&InteractionOptions::default());
        points.rebuild(&descriptors, 0);

        group.bench_function(format!("{count}_points"), |b| {
            b.iter(|| black_box(points.pick(black_box(&ray))))
        });
    }
    group.finish();
}

criterion_group!(benches, framing_benchmark, picking_benchmark);
criterion_main!(benches);
