//! Criterion benchmarks for segwarp-dtw: exact DTW, FastDTW and resampling.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use segwarp_dtw::{Aligner, Dtw, FastDtw, TimeSeries, interpolate};

fn make_sine_series(n: usize, offset: f64) -> TimeSeries {
    let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin() + offset).collect();
    TimeSeries::new(values).unwrap()
}

fn bench_alignment(c: &mut Criterion) {
    let lengths = [64usize, 256, 1024];
    let mut group = c.benchmark_group("alignment_distance");

    for &len in &lengths {
        let a = make_sine_series(len, 0.0);
        let b = make_sine_series(len + len / 8, 1.0);

        group.bench_with_input(BenchmarkId::new("dtw", len), &(&a, &b), |bencher, (a, b)| {
            bencher.iter(|| Dtw.distance(a.as_view(), b.as_view()));
        });
        for radius in [1usize, 10] {
            let fast = FastDtw::new(radius);
            group.bench_with_input(
                BenchmarkId::new(format!("fastdtw_r{radius}"), len),
                &(&a, &b),
                |bencher, (a, b)| {
                    bencher.iter(|| fast.distance(a.as_view(), b.as_view()));
                },
            );
        }
    }

    group.finish();
}

fn bench_path(c: &mut Criterion) {
    let a = make_sine_series(256, 0.0);
    let b = make_sine_series(240, 0.5);

    c.bench_function("dtw_path_256x240", |bencher| {
        bencher.iter(|| Dtw.distance_and_path(a.as_view(), b.as_view()));
    });
}

fn bench_interpolate(c: &mut Criterion) {
    let a = make_sine_series(512, 0.0);

    c.bench_function("interpolate_512_to_700", |bencher| {
        bencher.iter(|| interpolate(a.as_slice(), 700).unwrap());
    });
}

criterion_group!(benches, bench_alignment, bench_path, bench_interpolate);
criterion_main!(benches);
