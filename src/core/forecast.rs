//! Forecast result structure holding point predictions and intervals.

use chrono::NaiveDate;

use crate::error::{EstimationError, Result};

/// One forecast step with its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastPoint {
    /// 1-based number of periods past the end of the sample.
    pub step: usize,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
    pub date: Option<NaiveDate>,
}

/// Point forecasts with symmetric intervals at a fixed confidence level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastResult {
    point: Vec<f64>,
    std_errors: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    level: f64,
    dates: Option<Vec<NaiveDate>>,
}

impl ForecastResult {
    /// Build intervals `point ± critical * std_error` for each step.
    pub fn from_std_errors(
        point: Vec<f64>,
        std_errors: Vec<f64>,
        critical: f64,
        level: f64,
    ) -> Result<Self> {
        if point.len() != std_errors.len() {
            return Err(EstimationError::DimensionMismatch {
                expected: point.len(),
                got: std_errors.len(),
            });
        }
        let lower = point
            .iter()
            .zip(&std_errors)
            .map(|(p, se)| p - critical * se)
            .collect();
        let upper = point
            .iter()
            .zip(&std_errors)
            .map(|(p, se)| p + critical * se)
            .collect();
        Ok(Self {
            point,
            std_errors,
            lower,
            upper,
            level,
            dates: None,
        })
    }

    /// Attach calendar dates to the forecast steps.
    pub fn with_dates(mut self, dates: Option<Vec<NaiveDate>>) -> Result<Self> {
        if let Some(d) = &dates {
            if d.len() != self.point.len() {
                return Err(EstimationError::DimensionMismatch {
                    expected: self.point.len(),
                    got: d.len(),
                });
            }
        }
        self.dates = dates;
        Ok(self)
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Standard error of each step's forecast error.
    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    /// Confidence level of the intervals.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Iterate over the forecast steps in order.
    pub fn points(&self) -> impl Iterator<Item = ForecastPoint> + '_ {
        (0..self.horizon()).map(move |i| ForecastPoint {
            step: i + 1,
            value: self.point[i],
            lower: self.lower[i],
            upper: self.upper[i],
            date: self.dates.as_ref().map(|d| d[i]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn intervals_are_symmetric_around_point() {
        let f = ForecastResult::from_std_errors(vec![10.0, 11.0], vec![1.0, 2.0], 1.96, 0.95)
            .unwrap();
        assert_eq!(f.horizon(), 2);
        assert_relative_eq!(f.lower()[0], 8.04, epsilon = 1e-12);
        assert_relative_eq!(f.upper()[1], 14.92, epsilon = 1e-12);
        assert_eq!(f.level(), 0.95);
        assert!(f.dates().is_none());
    }

    #[test]
    fn points_iterate_in_step_order() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let f = ForecastResult::from_std_errors(vec![1.0, 2.0, 3.0], vec![0.0; 3], 2.0, 0.9)
            .unwrap()
            .with_dates(Some(vec![d; 3]))
            .unwrap();
        let steps: Vec<_> = f.points().map(|p| (p.step, p.value)).collect();
        assert_eq!(steps, vec![(1, 1.0), (2, 2.0), (3, 3.0)]);
        assert!(f.points().all(|p| p.date == Some(d) && p.lower == p.upper));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            ForecastResult::from_std_errors(vec![1.0], vec![], 1.0, 0.95),
            Err(EstimationError::DimensionMismatch { .. })
        ));
        let f = ForecastResult::from_std_errors(vec![1.0], vec![1.0], 1.0, 0.95).unwrap();
        assert!(f.with_dates(Some(vec![])).is_err());
    }
}
