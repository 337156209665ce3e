//! Straight-line extrapolation of a yearly series.
//!
//! Fits `value = slope · year + intercept` by ordinary least squares over the
//! whole history and evaluates it at later years. There is no seasonality or
//! confidence band; the same input always gives the same output.

use crate::data::model::{CanonicalSeries, ForecastResult};
use crate::error::{DashboardError, Result};

/// Fewest distinct years a line can be fitted through.
pub const MIN_PERIODS: usize = 2;

/// A fitted single-feature OLS line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination over the fitted history.
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit over every point of `series`.
    pub fn fit(series: &CanonicalSeries) -> Result<Self> {
        let n = series.len();
        if n < MIN_PERIODS {
            return Err(DashboardError::InsufficientData {
                required: MIN_PERIODS,
                actual: n,
            });
        }

        // Periods are unique, so with n >= 2 the x-variance is non-zero.
        let nf = n as f64;
        let mean_x = series.periods().map(f64::from).sum::<f64>() / nf;
        let mean_y = series.points().iter().map(|&(_, y)| y).sum::<f64>() / nf;

        let (sxx, sxy) = series
            .points()
            .iter()
            .fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
                let dx = f64::from(x) - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ss_tot: f64 = series.points().iter().map(|&(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = series
            .points()
            .iter()
            .map(|&(x, y)| (y - (slope * f64::from(x) + intercept)).powi(2))
            .sum();
        let r_squared = if ss_tot > 1e-12 { 1.0 - ss_res / ss_tot } else { 1.0 };

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn predict_at(&self, period: i32) -> f64 {
        self.slope * f64::from(period) + self.intercept
    }
}

/// Predict each of `future_periods`, in the order given.
///
/// Requested years at or before the last observed year are skipped so the
/// result never overlaps the history.
pub fn forecast(series: &CanonicalSeries, future_periods: &[i32]) -> Result<ForecastResult> {
    let fit = LinearFit::fit(series)?;
    Ok(forecast_with(&fit, series, future_periods))
}

/// [`forecast`] with an already-fitted line.
fn forecast_with(fit: &LinearFit, series: &CanonicalSeries, future_periods: &[i32]) -> ForecastResult {
    let last = series.last_period().unwrap_or(i32::MIN);
    let points = future_periods
        .iter()
        .copied()
        .filter(|&p| p > last)
        .map(|p| (p, fit.predict_at(p)))
        .collect();
    ForecastResult { points }
}

/// Inclusive year range, e.g. 2025..=2040.
pub fn horizon(first: i32, last: i32) -> Vec<i32> {
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i32, f64)]) -> CanonicalSeries {
        CanonicalSeries::from_observations(points.iter().map(|&(p, v)| (Some(p), Some(v))))
    }

    #[test]
    fn temperature_trend_extrapolates() {
        let s = series(&[(2020, 0.98), (2021, 1.02), (2022, 1.06)]);
        let result = forecast(&s, &[2023]).unwrap();
        assert_eq!(result.points.len(), 1);
        let (year, value) = result.points[0];
        assert_eq!(year, 2023);
        assert!((value - 1.10).abs() < 0.05, "got {value}");
    }

    #[test]
    fn exact_line_is_recovered() {
        let s = series(&[(2000, 10.0), (2001, 12.0), (2002, 14.0), (2003, 16.0)]);
        let fit = LinearFit::fit(&s).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!((fit.predict_at(2010) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn single_period_is_insufficient() {
        let s = series(&[(2020, 1.0)]);
        assert_eq!(
            forecast(&s, &[2021]).unwrap_err(),
            DashboardError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
        assert!(forecast(&CanonicalSeries::default(), &[2021]).is_err());
    }

    #[test]
    fn forecast_is_deterministic() {
        let s = series(&[(1990, 300.0), (1995, 340.0), (2000, 410.0), (2005, 390.0)]);
        let years = horizon(2025, 2040);
        let a = forecast(&s, &years).unwrap();
        let b = forecast(&s, &years).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.points.len(), 16);
        assert!(a
            .points
            .iter()
            .zip(&b.points)
            .all(|(x, y)| x.1.to_bits() == y.1.to_bits()));
    }

    #[test]
    fn periods_not_after_history_are_skipped() {
        let s = series(&[(2020, 1.0), (2024, 5.0)]);
        let result = forecast(&s, &[2023, 2026, 2024, 2025]).unwrap();
        let years: Vec<i32> = result.points.iter().map(|&(p, _)| p).collect();
        assert_eq!(years, vec![2026, 2025]);
    }

    #[test]
    fn horizon_is_inclusive() {
        assert_eq!(horizon(2025, 2027), vec![2025, 2026, 2027]);
        assert!(horizon(2030, 2025).is_empty());
    }
}
