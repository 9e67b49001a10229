//! Integration tests for classical seasonal decomposition.

use anofox_estimate::core::{Frequency, TimeSeries};
use anofox_estimate::error::EstimationError;
use anofox_estimate::seasonality::{DecompositionModel, SeasonalDecomposer};
use approx::assert_relative_eq;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn monthly_sales(years: usize, seed: u64) -> Vec<f64> {
    let pattern = [-8.0, -6.0, -2.0, 1.0, 4.0, 7.0, 9.0, 8.0, 3.0, -1.0, -5.0, -10.0];
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.5).unwrap();
    (0..years * 12)
        .map(|i| 100.0 + 0.5 * i as f64 + pattern[i % 12] + noise.sample(&mut rng))
        .collect()
}

#[test]
fn constant_series_has_flat_components() {
    let result = SeasonalDecomposer::new(12).decompose(&[5.0; 36]).unwrap();

    for t in result.trend()[6..30].iter() {
        assert_relative_eq!(t.unwrap(), 5.0, epsilon = 1e-12);
    }
    assert!(result.trend()[..6].iter().all(Option::is_none));
    assert!(result.trend()[30..].iter().all(Option::is_none));
    for s in result.seasonal() {
        assert_relative_eq!(*s, 0.0, epsilon = 1e-12);
    }
    for r in result.residual().iter().flatten() {
        assert_relative_eq!(*r, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn components_reconstruct_observations() {
    let values = monthly_sales(5, 17);
    let result = SeasonalDecomposer::new(12).decompose(&values).unwrap();

    for (rebuilt, y) in result.reconstruct().iter().zip(&values) {
        if let Some(v) = rebuilt {
            assert_relative_eq!(*v, *y, epsilon = 1e-9);
        }
    }
    assert_eq!(result.defined_range(), 6..54);
}

#[test]
fn recovers_known_seasonal_pattern() {
    let values = monthly_sales(6, 3);
    let result = SeasonalDecomposer::new(12).decompose(&values).unwrap();

    let factors = result.seasonal_factors();
    assert_relative_eq!(factors.iter().sum::<f64>(), 0.0, epsilon = 1e-9);
    // peak in July, trough in December
    assert!(factors[6] > 7.0);
    assert!(factors[11] < -8.0);
    assert!(result.seasonal_strength() > 0.9);
    assert!(result.trend_strength() > 0.9);
}

#[test]
fn odd_period_uses_simple_window() {
    let weekly: Vec<f64> = (0..28)
        .map(|i| 10.0 + [3.0, 1.0, 0.0, -1.0, -2.0, -2.0, 1.0][i % 7])
        .collect();
    let result = SeasonalDecomposer::new(7).decompose(&weekly).unwrap();

    assert!(result.trend()[..3].iter().all(Option::is_none));
    assert!(result.trend()[3].is_some());
    assert!(result.trend()[24].is_some());
    assert!(result.trend()[25..].iter().all(Option::is_none));
    for t in result.trend().iter().flatten() {
        assert_relative_eq!(*t, 10.0, epsilon = 1e-12);
    }
}

#[test]
fn decomposes_dated_series_with_its_period() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
    let series = TimeSeries::seasonal(monthly_sales(4, 8), 12)
        .unwrap()
        .with_start(start, Frequency::MonthEnd);
    let decomposer = SeasonalDecomposer::for_series(&series);
    assert_eq!(decomposer.period(), 12);

    let result = decomposer.decompose_series(&series).unwrap();
    assert_eq!(result.observed().len(), 48);
    assert_eq!(result.period(), 12);
}

#[test]
fn rejects_invalid_configurations() {
    let values = monthly_sales(3, 1);
    assert!(matches!(
        SeasonalDecomposer::new(1).decompose(&values),
        Err(EstimationError::InvalidParameter(_))
    ));
    assert!(matches!(
        SeasonalDecomposer::new(12).decompose(&values[..23]),
        Err(EstimationError::InsufficientData { needed: 24, got: 23 })
    ));
    assert!(matches!(
        SeasonalDecomposer::new(12)
            .with_model(DecompositionModel::Multiplicative)
            .decompose(&values),
        Err(EstimationError::InvalidParameter(_))
    ));

    let mut gappy = values.clone();
    gappy[5] = f64::NAN;
    assert!(matches!(
        SeasonalDecomposer::new(12).decompose(&gappy),
        Err(EstimationError::MissingValues)
    ));
}
