use chrono::{Datelike, NaiveDate};

use shelfcast_sales::DailySeries;

use crate::engine::forecast_dates;
use crate::error::ForecastError;
use crate::model::{DemandModel, mean};

/// Deterministic trend + weekly seasonality model.
///
/// Model:
/// - Fit `y = intercept + slope * t` by ordinary least squares over the whole
///   daily series (`t` = day index).
/// - If the series covers at least `min_seasonal_cycles` full weeks, take the
///   mean residual per weekday as an additive seasonal offset, centered so the
///   offsets sum to zero.
/// - Predict by extending the line and adding the weekday offset of each
///   future date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendModel {
    /// Seasonal cycle length in days.
    period: usize,
    /// Full cycles required before seasonality is fitted.
    min_seasonal_cycles: usize,
}

/// Fitted coefficients (exposed for diagnostics and tests).
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    pub intercept: f64,
    pub slope: f64,
    /// Offset per weekday, Monday first. All zero when seasonality was not fitted.
    pub weekday_offsets: [f64; 7],
    pub seasonal: bool,
}

impl TrendFit {
    fn value_at(&self, t: f64, date: NaiveDate) -> f64 {
        let weekday = date.weekday().num_days_from_monday() as usize;
        self.intercept + self.slope * t + self.weekday_offsets[weekday]
    }
}

impl TrendModel {
    pub const WEEK: usize = 7;

    pub fn new() -> Self {
        Self {
            period: Self::WEEK,
            min_seasonal_cycles: 2,
        }
    }

    pub fn with_min_seasonal_cycles(mut self, cycles: usize) -> Self {
        self.min_seasonal_cycles = cycles;
        self
    }

    pub fn fit(&self, series: &DailySeries) -> Result<TrendFit, ForecastError> {
        let y: Vec<f64> = series.quantities().iter().map(|&q| q as f64).collect();
        if y.len() < 2 {
            return Err(ForecastError::model_failure(format!(
                "trend fit needs at least 2 points, got {}",
                y.len()
            )));
        }

        let t: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        let t_mean = mean(&t);
        let y_mean = mean(&y);

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (ti, yi) in t.iter().zip(y.iter()) {
            let dt = ti - t_mean;
            sxx += dt * dt;
            sxy += dt * (yi - y_mean);
        }
        if sxx <= f64::EPSILON {
            return Err(ForecastError::model_failure("degenerate time index"));
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * t_mean;

        let mut fit = TrendFit {
            intercept,
            slope,
            weekday_offsets: [0.0; 7],
            seasonal: false,
        };

        if y.len() >= self.period * self.min_seasonal_cycles.max(1) {
            let mut buckets: [Vec<f64>; 7] = Default::default();
            for (i, point) in series.points().enumerate() {
                let trend = intercept + slope * i as f64;
                let weekday = point.date.weekday().num_days_from_monday() as usize;
                buckets[weekday].push(point.quantity as f64 - trend);
            }

            let raw: Vec<f64> = buckets.iter().map(|b| mean(b)).collect();
            let center = mean(&raw);
            for (offset, r) in fit.weekday_offsets.iter_mut().zip(raw) {
                *offset = r - center;
            }
            fit.seasonal = true;
        }

        if !(fit.intercept.is_finite()
            && fit.slope.is_finite()
            && fit.weekday_offsets.iter().all(|o| o.is_finite()))
        {
            return Err(ForecastError::model_failure("non-finite coefficients"));
        }

        Ok(fit)
    }
}

impl Default for TrendModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandModel for TrendModel {
    fn name(&self) -> &'static str {
        "linear_trend_weekly"
    }

    fn predict(&self, series: &DailySeries, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        let fit = self.fit(series)?;
        let last_t = (series.len() - 1) as f64;

        let dates = forecast_dates(series.last_date(), horizon)
            .ok_or_else(|| ForecastError::model_failure("forecast dates run past the calendar"))?;
        let predictions: Vec<f64> = dates
            .into_iter()
            .enumerate()
            .map(|(h, date)| fit.value_at(last_t + (h + 1) as f64, date))
            .collect();

        if let Some(bad) = predictions.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::model_failure(format!("non-finite prediction {bad}")));
        }
        Ok(predictions)
    }
}
