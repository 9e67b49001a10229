//! Ordered series with an implicit fixed-period index.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{ensure_finite, EstimationError, Result};

/// Spacing between consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    Daily,
    Weekly,
    /// Same day-of-month each month (clamped to the month length).
    #[default]
    Monthly,
    /// Last calendar day of each month.
    MonthEnd,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Natural seasonal period for this spacing, if there is one.
    pub fn default_period(&self) -> Option<usize> {
        match self {
            Frequency::Daily => Some(7),
            Frequency::Weekly => Some(52),
            Frequency::Monthly | Frequency::MonthEnd => Some(12),
            Frequency::Quarterly => Some(4),
            Frequency::Yearly => None,
        }
    }

    /// Date `steps` periods after `start`.
    pub fn advance(&self, start: NaiveDate, steps: usize) -> Result<NaiveDate> {
        let overflow = || {
            EstimationError::InvalidParameter(format!(
                "date {start} advanced by {steps} {self:?} periods overflows the calendar"
            ))
        };
        let months = |m: usize| u32::try_from(m).map(Months::new).map_err(|_| overflow());
        let date = match self {
            Frequency::Daily => start.checked_add_days(Days::new(steps as u64)),
            Frequency::Weekly => start.checked_add_days(Days::new(7 * steps as u64)),
            Frequency::Monthly => start.checked_add_months(months(steps)?),
            Frequency::Quarterly => start.checked_add_months(months(3 * steps)?),
            Frequency::Yearly => start.checked_add_months(months(12 * steps)?),
            Frequency::MonthEnd => start
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(1)))
                .and_then(|next| {
                    u32::try_from(steps)
                        .ok()
                        .and_then(|s| next.checked_add_months(Months::new(s)))
                })
                .and_then(|d| d.checked_sub_days(Days::new(1))),
        };
        date.ok_or_else(overflow)
    }
}

/// An ordered sequence of observations with a declared seasonal period.
///
/// The index is implicit: observation `i` sits `i` periods after the
/// optional start date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    values: Vec<f64>,
    period: usize,
    frequency: Frequency,
    start: Option<NaiveDate>,
}

impl TimeSeries {
    /// Create a non-seasonal series (period 1). Values must be finite.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(EstimationError::EmptyData);
        }
        ensure_finite(&values)?;
        Ok(Self {
            values,
            period: 1,
            frequency: Frequency::default(),
            start: None,
        })
    }

    /// Create a series with a declared seasonal period.
    pub fn seasonal(values: Vec<f64>, period: usize) -> Result<Self> {
        Self::new(values)?.with_period(period)
    }

    /// Set the seasonal period.
    pub fn with_period(mut self, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EstimationError::InvalidParameter(
                "seasonal period must be positive".into(),
            ));
        }
        self.period = period;
        Ok(self)
    }

    /// Anchor the index at `start` with the given spacing.
    pub fn with_start(mut self, start: NaiveDate, frequency: Frequency) -> Self {
        self.start = Some(start);
        self.frequency = frequency;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Date of observation `index`, if the series is anchored.
    pub fn date_at(&self, index: usize) -> Result<Option<NaiveDate>> {
        self.start
            .map(|s| self.frequency.advance(s, index))
            .transpose()
    }

    /// Dates of the `steps` periods following the last observation.
    pub fn future_dates(&self, steps: usize) -> Result<Option<Vec<NaiveDate>>> {
        let Some(start) = self.start else {
            return Ok(None);
        };
        let n = self.len();
        (0..steps)
            .map(|h| self.frequency.advance(start, n + h))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Split into a leading training part of `len` observations and the rest.
    ///
    /// The trailing part keeps the period and frequency and is re-anchored
    /// at its own first date.
    pub fn split_at(&self, len: usize) -> Result<(TimeSeries, TimeSeries)> {
        if len == 0 || len >= self.len() {
            return Err(EstimationError::InvalidParameter(format!(
                "split point {len} must lie inside a series of length {}",
                self.len()
            )));
        }
        let head = Self {
            values: self.values[..len].to_vec(),
            ..self.clone()
        };
        let tail = Self {
            values: self.values[len..].to_vec(),
            start: self.date_at(len)?,
            ..self.clone()
        };
        Ok((head, tail))
    }
}
