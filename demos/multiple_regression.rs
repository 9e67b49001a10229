//! Multiple regression with named predictors and collinearity diagnostics.
//!
//! Run with: cargo run --example multiple_regression

use anofox_estimate::regression::{DesignMatrix, OlsEstimator};
use anofox_estimate::utils::{correlation_matrix, describe};
use anofox_estimate::validation::{durbin_watson, normality_test};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Multiple Regression ===\n");

    // House prices (k$) explained by size, age and distance to the city center
    let size: Vec<f64> = (0..40).map(|i| 80.0 + 3.0 * i as f64 + (i as f64 * 1.3).sin() * 15.0).collect();
    let age: Vec<f64> = (0..40).map(|i| 5.0 + ((i * 7) % 30) as f64).collect();
    let distance: Vec<f64> = (0..40).map(|i| 2.0 + ((i * 11) % 17) as f64 * 0.8).collect();
    let price: Vec<f64> = (0..40)
        .map(|i| {
            50.0 + 1.8 * size[i] - 1.2 * age[i] - 4.5 * distance[i] + (i as f64 * 2.7).cos() * 8.0
        })
        .collect();

    let summary = describe(&price).unwrap();
    println!(
        "price: n = {}, mean = {:.1}, sd = {:.1}, range = [{:.1}, {:.1}]",
        summary.n, summary.mean, summary.std_dev, summary.min, summary.max
    );

    let columns = vec![size, age, distance];
    let names = ["size", "age", "distance"];

    println!("\n--- Predictor Correlations ---");
    for (name, row) in names.iter().zip(correlation_matrix(&columns).unwrap()) {
        let cells: Vec<String> = row.iter().map(|r| format!("{r:>7.3}")).collect();
        println!("{name:>9} {}", cells.join(" "));
    }

    let design = DesignMatrix::from_columns(&names, &columns, true).unwrap();
    let fit = OlsEstimator::new().fit(design, &price).unwrap();

    println!("\n--- Coefficients ---");
    for row in fit.coefficient_table().unwrap() {
        println!(
            "{:>9}: {:>9.4} (se {:.4}, p = {:.2e})",
            row.name, row.coefficient, row.std_error, row.p_value
        );
    }
    println!("R² = {:.4}, adjusted R² = {:.4}", fit.r_squared(), fit.adjusted_r_squared());

    println!("\n--- Variance Inflation Factors ---");
    for vif in fit.variance_inflation_factors().unwrap() {
        println!("{:>9}: {:.3}", vif.name, vif.vif);
    }

    println!("\n--- Residual Diagnostics ---");
    let residuals = fit.residuals();
    let dw = durbin_watson(residuals).unwrap();
    println!("Durbin-Watson: {:.3} ({:?})", dw.statistic, dw.interpretation);
    let normality = normality_test(residuals).unwrap();
    println!(
        "Normality K²: {:.3} (p = {:.3}), skewness {:.3}, kurtosis {:.3}",
        normality.statistic, normality.p_value, normality.skewness, normality.kurtosis
    );
}
