//! Property-based tests for the estimators.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated data.

use anofox_estimate::models::arima::ArimaSpec;
use anofox_estimate::regression::OlsEstimator;
use anofox_estimate::seasonality::SeasonalDecomposer;
use proptest::prelude::*;

/// Strategy for a response and `k` predictor columns of equal length.
///
/// A small index-dependent term keeps columns from being exactly constant.
fn regression_strategy(
    min_len: usize,
    max_len: usize,
    k: usize,
) -> impl Strategy<Value = (Vec<f64>, Vec<Vec<f64>>)> {
    (min_len..max_len).prop_flat_map(move |len| {
        (
            prop::collection::vec(-100.0..100.0_f64, len),
            prop::collection::vec(prop::collection::vec(-50.0..50.0_f64, len), k),
        )
            .prop_map(|(y, mut columns)| {
                for (j, column) in columns.iter_mut().enumerate() {
                    for (i, v) in column.iter_mut().enumerate() {
                        *v += (i * (j + 1)) as f64 * 1e-3;
                    }
                }
                (y, columns)
            })
    })
}

/// Strategy for seasonal series with noise.
fn seasonal_values_strategy(
    min_periods: usize,
    max_periods: usize,
    period: usize,
) -> impl Strategy<Value = Vec<f64>> {
    (min_periods..max_periods).prop_flat_map(move |periods| {
        let len = periods * period;
        (
            10.0..100.0_f64,
            1.0..20.0_f64,
            prop::collection::vec(-1.0..1.0_f64, len),
        )
            .prop_map(move |(base, amplitude, noise)| {
                noise
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        base + amplitude
                            * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                            + e
                    })
                    .collect()
            })
    })
}

/// Strategy for random walks.
fn random_walk_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(-1.0..1.0_f64, len).prop_map(|steps| {
            steps
                .iter()
                .scan(0.0, |level, s| {
                    *level += s;
                    Some(*level)
                })
                .collect()
        })
    })
}

// =============================================================================
// Property: OLS residuals are orthogonal to the design
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn ols_residuals_orthogonal_to_design((y, columns) in regression_strategy(10, 60, 2)) {
        let fit = OlsEstimator::new().fit_predictors(&y, &columns);
        prop_assume!(fit.is_ok());
        let fit = fit.unwrap();

        let residuals = fit.residuals();
        let e_norm = residuals.iter().map(|e| e * e).sum::<f64>().sqrt();
        prop_assert!(residuals.iter().sum::<f64>().abs() <= 1e-8 * (1.0 + e_norm) * y.len() as f64);
        for column in &columns {
            let x_norm = column.iter().map(|x| x * x).sum::<f64>().sqrt();
            let dot: f64 = column.iter().zip(residuals).map(|(x, e)| x * e).sum();
            prop_assert!(dot.abs() <= 1e-8 * (1.0 + x_norm * e_norm));
        }
    }

    #[test]
    fn ols_r_squared_bounds((y, columns) in regression_strategy(10, 60, 3)) {
        let fit = OlsEstimator::new().fit_predictors(&y, &columns);
        prop_assume!(fit.is_ok());
        let fit = fit.unwrap();

        prop_assert!(fit.r_squared() >= -1e-12);
        prop_assert!(fit.r_squared() <= 1.0 + 1e-12);
        prop_assert!(fit.adjusted_r_squared() <= fit.r_squared() + 1e-12);
        prop_assert!((0.0..=1.0).contains(&fit.f_p_value()));
        for p in fit.p_values() {
            prop_assert!((0.0..=1.0).contains(p));
        }
    }
}

// =============================================================================
// Property: Decomposition components add back to the observations
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn decomposition_round_trip(values in seasonal_values_strategy(2, 8, 12)) {
        let result = SeasonalDecomposer::new(12).decompose(&values).unwrap();
        for (rebuilt, y) in result.reconstruct().iter().zip(&values) {
            if let Some(v) = rebuilt {
                prop_assert!((v - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn seasonal_factors_sum_to_zero(values in seasonal_values_strategy(2, 8, 7)) {
        let result = SeasonalDecomposer::new(7).decompose(&values).unwrap();
        let total: f64 = result.seasonal_factors().iter().sum();
        prop_assert!(total.abs() < 1e-9);
        for (i, s) in result.seasonal().iter().enumerate() {
            prop_assert_eq!(*s, result.seasonal_factors()[i % 7]);
        }
    }
}

// =============================================================================
// Property: ARIMA forecasts have the requested length and widening intervals
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn arima_forecast_length_matches_horizon(
        values in random_walk_strategy(30, 100),
        horizon in 1usize..24
    ) {
        let model = ArimaSpec::new(0, 1, 0).fit_values(&values).unwrap();
        let forecast = model.forecast(horizon, 0.95).unwrap();
        prop_assert_eq!(forecast.horizon(), horizon);
        prop_assert_eq!(forecast.lower().len(), horizon);
        prop_assert_eq!(forecast.upper().len(), horizon);
    }

    #[test]
    fn arima_interval_width_monotonic(
        values in random_walk_strategy(40, 120),
        horizon in 2usize..20
    ) {
        let model = ArimaSpec::new(1, 1, 0).fit_values(&values);
        prop_assume!(model.is_ok());
        let forecast = model.unwrap().forecast(horizon, 0.9).unwrap();

        let widths: Vec<f64> = forecast
            .upper()
            .iter()
            .zip(forecast.lower())
            .map(|(u, l)| u - l)
            .collect();
        for w in widths.windows(2) {
            prop_assert!(w[1] >= w[0] - 1e-12);
        }
        for ((l, p), u) in forecast.lower().iter().zip(forecast.point()).zip(forecast.upper()) {
            prop_assert!(l <= p && p <= u);
        }
    }
}
