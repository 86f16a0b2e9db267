use shelfcast_sales::DailySeries;

use crate::error::ForecastError;
use crate::model::{DemandModel, mean};

/// Moving-average fallback: every day ahead repeats the mean of the last
/// `window` days (or of the whole series if it is shorter; `0` if empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveModel {
    window: usize,
}

impl NaiveModel {
    pub const DEFAULT_WINDOW: usize = 7;

    pub fn new() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn level(&self, series: &DailySeries) -> f64 {
        let quantities = series.quantities();
        let take = self.window.min(quantities.len());
        let recent: Vec<f64> = quantities[quantities.len() - take..]
            .iter()
            .map(|&q| q as f64)
            .collect();
        mean(&recent)
    }
}

impl Default for NaiveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandModel for NaiveModel {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn predict(&self, series: &DailySeries, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        Ok(vec![self.level(series); horizon])
    }
}
