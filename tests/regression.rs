//! Integration tests for OLS regression.
//!
//! Synthetic data is drawn from explicitly seeded generators owned by each
//! test.

use anofox_estimate::error::EstimationError;
use anofox_estimate::regression::{DesignMatrix, OlsConfig, OlsEstimator};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// y = intercept + Σ slopes[j] * x_j + N(0, sigma²), predictors uniform on [0, 10).
fn linear_sample(
    n: usize,
    intercept: f64,
    slopes: &[f64],
    sigma: f64,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sigma).unwrap();
    let columns: Vec<Vec<f64>> = slopes
        .iter()
        .map(|_| (0..n).map(|_| rng.gen_range(0.0..10.0)).collect())
        .collect();
    let y = (0..n)
        .map(|i| {
            intercept
                + slopes
                    .iter()
                    .zip(&columns)
                    .map(|(b, c)| b * c[i])
                    .sum::<f64>()
                + noise.sample(&mut rng)
        })
        .collect();
    (columns, y)
}

#[test]
fn exact_line_scenario() {
    let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
    let fit = OlsEstimator::new().fit_predictors(&y, &[x]).unwrap();

    assert_relative_eq!(fit.coefficients()[1], 2.0, epsilon = 1e-10);
    assert_relative_eq!(fit.coefficients()[0], 0.0, epsilon = 1e-10);
    assert_relative_eq!(fit.r_squared(), 1.0, epsilon = 1e-12);
    assert!(fit.p_values().iter().all(|&p| p < 1e-10));
}

#[test]
fn estimates_converge_for_large_samples() {
    let (columns, y) = linear_sample(10_000, 3.0, &[2.0], 1.0, 42);
    let fit = OlsEstimator::new().fit_predictors(&y, &columns).unwrap();

    assert!((fit.coefficients()[0] - 3.0).abs() < 0.05);
    assert!((fit.coefficients()[1] - 2.0).abs() < 0.05);
    assert!((fit.residual_std_error() - 1.0).abs() < 0.05);
    assert!(fit.p_values()[1] < 1e-12);
}

#[test]
fn residuals_are_orthogonal_to_every_column() {
    let (columns, y) = linear_sample(200, 1.0, &[0.5, -1.5, 2.0], 2.0, 7);
    let fit = OlsEstimator::new()
        .fit_named(&y, &["price", "advertising", "season"], &columns)
        .unwrap();

    let xte = fit
        .design()
        .matrix()
        .transpose_mul_vec(fit.residuals())
        .unwrap();
    for v in xte {
        assert!(v.abs() < 1e-8);
    }
    let summary = fit.residual_summary();
    assert!(summary.mean.abs() < 1e-10);
}

#[test]
fn goodness_of_fit_bounds() {
    let (columns, y) = linear_sample(60, 0.0, &[0.3, 0.1], 3.0, 11);
    let fit = OlsEstimator::new().fit_predictors(&y, &columns).unwrap();

    assert!((0.0..=1.0).contains(&fit.r_squared()));
    assert!(fit.adjusted_r_squared() <= fit.r_squared());
    assert_eq!(fit.df_model(), 2);
    assert_eq!(fit.df_resid(), 57);

    let ss_model = fit.sst() - fit.ssr();
    let f = (ss_model / 2.0) / (fit.ssr() / 57.0);
    assert_relative_eq!(fit.f_statistic(), f, max_relative = 1e-10);
    assert!((0.0..=1.0).contains(&fit.f_p_value()));
}

#[test]
fn covariance_diagonal_matches_standard_errors() {
    let (columns, y) = linear_sample(40, 5.0, &[1.0, 2.0], 1.0, 3);
    let fit = OlsEstimator::new().fit_predictors(&y, &columns).unwrap();
    for (var, se) in fit.covariance().diagonal().iter().zip(fit.std_errors()) {
        assert_relative_eq!(var.sqrt(), *se, epsilon = 1e-12);
    }
    for ((b, se), t) in fit.coefficients().iter().zip(fit.std_errors()).zip(fit.t_values()) {
        assert_relative_eq!(b / se, *t, epsilon = 1e-12);
    }
}

#[test]
fn prediction_intervals_widen_with_distance_from_mean() {
    let (columns, y) = linear_sample(100, 2.0, &[1.0], 1.0, 5);
    let fit = OlsEstimator::new().fit_predictors(&y, &columns).unwrap();
    let x_mean = columns[0].iter().sum::<f64>() / 100.0;

    let rows: Vec<Vec<f64>> = [0.0, 1.0, 3.0, 8.0, 20.0]
        .iter()
        .map(|d| vec![x_mean + d])
        .collect();
    let pred = fit.predict(&rows, 0.95).unwrap();
    let widths: Vec<f64> = pred
        .upper()
        .iter()
        .zip(pred.lower())
        .map(|(u, l)| u - l)
        .collect();
    assert!(widths.windows(2).all(|w| w[1] > w[0]));

    let wider = fit.predict(&rows, 0.99).unwrap();
    assert!(wider.upper()[0] - wider.lower()[0] > widths[0]);
}

#[test]
fn model_without_intercept() {
    let (columns, y) = linear_sample(80, 0.0, &[4.0], 0.5, 9);
    let est = OlsEstimator::with_config(OlsConfig::default().with_intercept(false));
    let fit = est.fit_predictors(&y, &columns).unwrap();
    assert_eq!(fit.n_params(), 1);
    assert!((fit.coefficients()[0] - 4.0).abs() < 0.05);
    assert!(fit.predict(&[vec![1.0]], 0.95).unwrap().mean()[0] > 3.9);
}

#[test]
fn variance_inflation_flags_collinear_design() {
    let mut rng = StdRng::seed_from_u64(21);
    let noise = Normal::new(0.0, 0.05).unwrap();
    let x1: Vec<f64> = (0..50).map(|_| rng.gen_range(0.0..10.0)).collect();
    let x2: Vec<f64> = x1.iter().map(|v| v + noise.sample(&mut rng)).collect();
    let x3: Vec<f64> = (0..50).map(|_| rng.gen_range(0.0..10.0)).collect();
    let design = DesignMatrix::from_predictors(&[x1, x2, x3], true).unwrap();

    let vif = anofox_estimate::regression::variance_inflation_factors(&design).unwrap();
    assert_eq!(vif[0].name, "const");
    assert!(vif[1].vif > 100.0);
    assert!(vif[2].vif > 100.0);
    assert!(vif[3].vif < 2.0);
}

#[test]
fn failure_modes() {
    let est = OlsEstimator::new();

    let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v + 1.0).collect();
    let y = vec![1.0, 2.5, 2.9, 4.2, 5.1, 5.8];
    assert!(matches!(
        est.fit_predictors(&y, &[x1.clone(), x2]),
        Err(EstimationError::SingularMatrix { .. })
    ));

    assert!(matches!(
        est.fit_predictors(&y[..2], &[x1[..2].to_vec()]),
        Err(EstimationError::InsufficientData { .. })
    ));

    let fit = est.fit_predictors(&y, &[x1]).unwrap();
    assert!(matches!(
        fit.predict(&[vec![1.0, 2.0]], 0.95),
        Err(EstimationError::DimensionMismatch { .. })
    ));
}
