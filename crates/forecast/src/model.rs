use shelfcast_sales::DailySeries;

use crate::error::ForecastError;

/// A demand model the engine can run.
///
/// Models return raw (unclipped, unrounded) daily predictions for the
/// `horizon` days after `series.last_date()`; the engine owns clipping,
/// rounding and dating. Models must be deterministic and must not mutate
/// anything outside themselves.
pub trait DemandModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict(&self, series: &DailySeries, horizon: usize) -> Result<Vec<f64>, ForecastError>;
}

impl<M: DemandModel + ?Sized> DemandModel for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn predict(&self, series: &DailySeries, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        (**self).predict(series, horizon)
    }
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}
