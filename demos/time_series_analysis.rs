//! Seasonal decomposition and ARIMA forecasting of a monthly series.
//!
//! Run with: cargo run --example time_series_analysis

use anofox_estimate::core::{Frequency, TimeSeries};
use anofox_estimate::models::arima::{evaluate_holdout, ArimaSpec};
use anofox_estimate::seasonality::SeasonalDecomposer;
use anofox_estimate::validation::ljung_box;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Time Series Analysis ===\n");

    let values: Vec<f64> = (0..72)
        .map(|i| {
            200.0
            + 1.5 * i as f64                                            // trend
            + 12.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin() // yearly cycle
            + 3.0 * (i as f64 * 1.9).cos()                               // noise
        })
        .collect();
    let start = NaiveDate::from_ymd_opt(2019, 1, 31).unwrap();
    let series = TimeSeries::seasonal(values, 12)
        .unwrap()
        .with_start(start, Frequency::MonthEnd);
    println!("{} monthly observations from {}", series.len(), start);

    println!("\n--- Classical Decomposition ---");
    let decomposition = SeasonalDecomposer::for_series(&series)
        .decompose_series(&series)
        .unwrap();
    for (month, factor) in decomposition.seasonal_factors().iter().enumerate() {
        println!("  month {:>2}: {:>7.2}", month + 1, factor);
    }
    println!("Seasonal strength: {:.3}", decomposition.seasonal_strength());
    println!("Trend strength:    {:.3}", decomposition.trend_strength());

    println!("\n--- ARIMA(1,1,1) ---");
    let model = match ArimaSpec::new(1, 1, 1).fit(&series) {
        Ok(model) => model,
        Err(e) => {
            println!("fit failed: {e}");
            return;
        }
    };
    println!("AR: {:?}", model.ar_coefficients());
    println!("MA: {:?}", model.ma_coefficients());
    println!("sigma²: {:.4}", model.sigma2());
    println!("AIC: {:.2}, BIC: {:.2}", model.aic(), model.bic());

    let lb = ljung_box(model.residuals(), None, 2).unwrap();
    println!("Ljung-Box Q = {:.3} (p = {:.3})", lb.statistic, lb.p_value);

    println!("\n--- Forecast with 95% Intervals ---");
    let forecast = model.forecast(6, 0.95).unwrap();
    println!("{:>12} {:>10} {:>10} {:>10}", "date", "lower", "forecast", "upper");
    println!("{:-<46}", "");
    for point in forecast.points() {
        let date = point.date.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "{:>12} {:>10.2} {:>10.2} {:>10.2}",
            date, point.lower, point.value, point.upper
        );
    }

    println!("\n--- Hold-out Evaluation (last 12 months) ---");
    let report = match evaluate_holdout(&series, ArimaSpec::new(1, 1, 1), 12) {
        Ok(report) => report,
        Err(e) => {
            println!("hold-out failed: {e}");
            return;
        }
    };
    println!("MAE:  {:.3}", report.metrics.mae);
    println!("RMSE: {:.3}", report.metrics.rmse);
    if let Some(mape) = report.metrics.mape {
        println!("MAPE: {:.2}%", mape);
    }
}
