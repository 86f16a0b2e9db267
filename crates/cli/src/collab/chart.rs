use chrono::NaiveDate;
use serde::Serialize;

use shelfcast_core::ProductId;
use shelfcast_forecast::ForecastPoint;
use shelfcast_sales::{DailyPoint, DailySeries};

/// The two series a sales chart plots: recent history, then the forecast
/// continuing from the day after the last historical day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub product: ProductId,
    pub history: Vec<DailyPoint>,
    pub forecast: Vec<ForecastPoint>,
}

impl ChartData {
    pub fn new(series: &DailySeries, history_days: usize, forecast: Vec<ForecastPoint>) -> Self {
        Self {
            product: series.product().clone(),
            history: series.tail(history_days),
            forecast,
        }
    }

    /// Dates from the first history day to the last forecast day.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self
            .history
            .first()
            .map(|p| p.date)
            .or_else(|| self.forecast.first().map(|p| p.date))?;
        let last = self
            .forecast
            .last()
            .map(|p| p.date)
            .or_else(|| self.history.last().map(|p| p.date))?;
        Some((first, last))
    }
}
