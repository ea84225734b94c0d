//! Benchmarks for level generation and range estimation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use gplot::{compute_range, generate_levels, ZeroPolicy};

fn bench_generate_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_levels");
    for count in [5usize, 15, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                generate_levels(
                    black_box(-3.7),
                    black_box(128.2),
                    count,
                    ZeroPolicy::MustBeLevel,
                )
            })
        });
    }
    group.finish();
}

fn bench_compute_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_range");
    for (ny, nx) in [(90usize, 180usize), (180, 360), (721, 1440)] {
        let field = Array2::from_shape_fn((ny, nx), |(i, j)| {
            let v = (i as f64 * 0.07).sin() * (j as f64 * 0.03).cos();
            if (i + j) % 97 == 0 {
                f64::NAN
            } else {
                v
            }
        });
        let view = field.view().into_dyn();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", ny, nx)),
            &view,
            |b, view| {
                b.iter(|| compute_range(&[view.clone()], None, None, Some(0.01), Some(0.01)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_generate_levels, bench_compute_range);
criterion_main!(benches);
