//! Benchmarks for the estimation routines.

use anofox_estimate::models::arima::ArimaSpec;
use anofox_estimate::regression::OlsEstimator;
use anofox_estimate::seasonality::SeasonalDecomposer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_regressors(n: usize, k: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
    let columns: Vec<Vec<f64>> = (0..k)
        .map(|j| {
            (0..n)
                .map(|i| ((i * (j + 3)) as f64 * 0.37).sin() * 10.0 + i as f64 * 0.01)
                .collect()
        })
        .collect();
    let y = (0..n)
        .map(|i| {
            1.0 + columns.iter().enumerate().map(|(j, c)| (j + 1) as f64 * c[i]).sum::<f64>()
                + (i as f64 * 1.7).cos()
        })
        .collect();
    (y, columns)
}

fn generate_seasonal(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            50.0 + 0.1 * i as f64
                + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                + (i as f64 * 2.3).cos() * 0.5
        })
        .collect()
}

fn generate_ar(n: usize) -> Vec<f64> {
    let mut z = 0.0;
    (0..n)
        .map(|i| {
            z = 0.6 * z + (i as f64 * 1.3).sin();
            10.0 + z
        })
        .collect()
}

fn bench_ols(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_fit");

    for size in [100, 1_000, 10_000].iter() {
        let (y, columns) = generate_regressors(*size, 5);
        group.bench_with_input(BenchmarkId::new("five_predictors", size), size, |b, _| {
            let estimator = OlsEstimator::new();
            b.iter(|| estimator.fit_predictors(black_box(&y), black_box(&columns)))
        });
    }

    group.finish();
}

fn bench_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("classical_decomposition");

    for size in [120, 1_200, 12_000].iter() {
        let values = generate_seasonal(*size, 12);
        group.bench_with_input(BenchmarkId::new("period_12", size), size, |b, _| {
            let decomposer = SeasonalDecomposer::new(12);
            b.iter(|| decomposer.decompose(black_box(&values)))
        });
    }

    group.finish();
}

fn bench_arima(c: &mut Criterion) {
    let mut group = c.benchmark_group("arima");

    for size in [100, 500].iter() {
        let values = generate_ar(*size);

        group.bench_with_input(BenchmarkId::new("fit_1_0_1", size), size, |b, _| {
            let spec = ArimaSpec::new(1, 0, 1);
            b.iter(|| spec.fit_values(black_box(&values)))
        });

        if let Ok(model) = ArimaSpec::new(1, 0, 1).fit_values(&values) {
            group.bench_with_input(BenchmarkId::new("forecast_24", size), size, |b, _| {
                b.iter(|| model.forecast(black_box(24), 0.95))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_ols, bench_decomposition, bench_arima);
criterion_main!(benches);
