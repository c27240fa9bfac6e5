/// Benchmark suite for world generation and visibility queries
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use terrain_engine::{EngineConfig, Frustum, NoiseField, TerrainEngine};

fn bench_noise(c: &mut Criterion) {
    c.bench_function("noise_sample_256", |b| {
        let field = NoiseField::new(42);
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..256 {
                sum += field.noise(black_box(i as f64 * 0.05), black_box(i as f64 * 0.03));
            }
            sum
        });
    });
}

fn bench_world_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_generation");
    group.sample_size(10);

    for &radius in &[1, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| {
                let mut engine = TerrainEngine::new(EngineConfig::default()).unwrap();
                black_box(engine.generate_world(radius).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_render_visible(c: &mut Criterion) {
    c.bench_function("render_visible_radius_6", |b| {
        let mut engine = TerrainEngine::new(EngineConfig::default()).unwrap();
        engine.generate_world(6).unwrap();
        let frustum = Frustum::from_perspective(75.0, 16.0 / 9.0, 0.1, 200.0).unwrap();
        b.iter(|| black_box(engine.render_visible(black_box(&frustum))));
    });
}

criterion_group!(benches, bench_noise, bench_world_generation, bench_render_visible);
criterion_main!(benches);
