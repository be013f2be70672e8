use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluidfield::grid::{Boundary, GridDims};
use fluidfield::solver::{advect, diffuse, project};
use fluidfield::{FluidConfig, FluidField, PointerTrail};
use glam::Vec2;

fn benchmark_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_update");

    // Grid sizes a host would pick for low, mid and high tier devices
    for size in [48, 96, 192].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut field = FluidField::new(size, size).unwrap();
            let mut trail = PointerTrail::default();
            let mut t = 0.0f32;

            b.iter(|| {
                t += 0.1;
                let center = Vec2::splat(size as f32 * 0.5);
                let pos = center + Vec2::new(t.cos(), t.sin()) * size as f32 * 0.3;
                field.update(
                    |f| {
                        trail.stamp(f, pos);
                    },
                    |f| {
                        black_box(f.density(size / 2, size / 2));
                    },
                );
            });
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let dims = GridDims::new(128, 128);
    let iterations = FluidConfig::default().iterations;
    let dt = FluidConfig::default().dt;

    let mut u = vec![0.0f32; dims.len()];
    let mut v = vec![0.0f32; dims.len()];
    for y in 0..dims.height {
        for x in 0..dims.width {
            let idx = dims.idx(x, y);
            u[idx] = ((x as f32) * 0.1).sin();
            v[idx] = ((y as f32) * 0.1).cos();
        }
    }
    let density = vec![1.0f32; dims.len()];

    group.bench_function("project", |b| {
        let mut u = u.clone();
        let mut v = v.clone();
        let mut p = vec![0.0f32; dims.len()];
        let mut div = vec![0.0f32; dims.len()];
        b.iter(|| project(&mut u, &mut v, &mut p, &mut div, iterations, dims));
    });

    group.bench_function("advect_density", |b| {
        let mut out = vec![0.0f32; dims.len()];
        b.iter(|| advect(Boundary::Scalar, &mut out, &density, &u, &v, dt, dims));
    });

    group.bench_function("diffuse_density", |b| {
        let mut out = vec![0.0f32; dims.len()];
        b.iter(|| diffuse(Boundary::Scalar, &mut out, &density, 0.001, dt, iterations, dims));
    });

    group.finish();
}

criterion_group!(benches, benchmark_update, benchmark_stages);
criterion_main!(benches);
