//! Simple linear regression with one predictor.
//!
//! Run with: cargo run --example simple_regression
//! Set RUST_LOG=anofox_estimate=debug to see estimator logging.

use anofox_estimate::regression::OlsEstimator;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Simple Linear Regression ===\n");

    // Advertising spend (k$) against weekly sales (units)
    let spend = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let sales = vec![12.1, 14.8, 18.2, 19.9, 24.1, 25.8, 29.7, 31.2, 35.1, 36.9];

    let fit = OlsEstimator::new()
        .fit_named(&sales, &["spend"], &[spend])
        .unwrap();

    println!("--- Coefficients ---");
    println!(
        "{:>8} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10}",
        "term", "estimate", "std err", "t", "p", "lower", "upper"
    );
    println!("{:-<72}", "");
    for row in fit.coefficient_table().unwrap() {
        println!(
            "{:>8} {:>10.4} {:>10.4} {:>8.2} {:>10.2e} {:>10.4} {:>10.4}",
            row.name, row.coefficient, row.std_error, row.t_value, row.p_value, row.lower, row.upper
        );
    }

    println!("\n--- Goodness of Fit ---");
    println!("R²:            {:.4}", fit.r_squared());
    println!("Adjusted R²:   {:.4}", fit.adjusted_r_squared());
    println!("F statistic:   {:.2} (p = {:.2e})", fit.f_statistic(), fit.f_p_value());
    println!("Residual SE:   {:.4} on {} df", fit.residual_std_error(), fit.df_resid());
    println!("AIC / BIC:     {:.2} / {:.2}", fit.aic(), fit.bic());

    println!("\n--- Prediction Intervals (95%) ---");
    let new_spend = [vec![5.5], vec![12.0], vec![20.0]];
    let prediction = fit.predict(&new_spend, 0.95).unwrap();
    for (i, row) in new_spend.iter().enumerate() {
        println!(
            "spend = {:>5.1}: {:>7.2}  [{:.2}, {:.2}]",
            row[0],
            prediction.mean()[i],
            prediction.lower()[i],
            prediction.upper()[i]
        );
    }
}
