use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use findprime::{calc_nth_prime, FinderConfig, PrimalityMode};
use std::io;

const REPEAT_ARGS: [u64; 3] = [2, 4, 6];

fn bench_calc_nth_prime(c: &mut Criterion) {
    let config = FinderConfig::new();
    let mut sink = io::sink();

    let mut group = c.benchmark_group("calc_nth_prime");
    group.sample_size(10);
    group.bench_function("naive", |b| {
        b.iter(|| calc_nth_prime(black_box(&config), &mut sink).unwrap())
    });
    group.finish();
}

fn bench_calc_nth_prime_args(c: &mut Criterion) {
    let config = FinderConfig::new();
    let mut sink = io::sink();

    let mut group = c.benchmark_group("calc_nth_prime_args");
    group.sample_size(10);
    for repeat in REPEAT_ARGS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(repeat), repeat, |b, &repeat| {
            b.iter(|| {
                for _ in 0..repeat {
                    calc_nth_prime(black_box(&config), &mut sink).unwrap();
                }
            })
        });
    }
    group.finish();
}

fn bench_calc_nth_prime_args_x2(c: &mut Criterion) {
    let config = FinderConfig::new();
    let mut sink = io::sink();

    let mut group = c.benchmark_group("calc_nth_prime_args_x2");
    group.sample_size(10);
    for repeat in REPEAT_ARGS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(repeat), repeat, |b, &repeat| {
            b.iter(|| {
                for _ in 0..repeat {
                    calc_nth_prime(black_box(&config), &mut sink).unwrap();
                    calc_nth_prime(black_box(&config), &mut sink).unwrap();
                }
            })
        });
    }
    group.finish();
}

// Not part of the reference suite; shows what the naive bound costs.
fn bench_mode_comparison(c: &mut Criterion) {
    let mut sink = io::sink();

    let mut group = c.benchmark_group("primality_mode");
    group.sample_size(10);
    for mode in [PrimalityMode::TrialDivision, PrimalityMode::SquareRootBounded] {
        let config = FinderConfig::new().with_mode(mode);
        group.bench_with_input(BenchmarkId::from_parameter(mode), &config, |b, config| {
            b.iter(|| calc_nth_prime(black_box(config), &mut sink).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_calc_nth_prime,
    bench_calc_nth_prime_args,
    bench_calc_nth_prime_args_x2,
    bench_mode_comparison
);
criterion_main!(benches);
