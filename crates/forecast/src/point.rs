use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfcast_core::{ProductId, ValueObject};

/// Predicted units sold on one future day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_quantity: u64,
}

impl ValueObject for ForecastPoint {}

/// Which model produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Linear trend with additive weekday seasonality.
    Trend,
    /// Mean of the most recent days, repeated.
    Naive,
}

impl Strategy {
    /// Pick a strategy from model availability and series length alone.
    pub fn select(trend_available: bool, history_len: usize) -> Self {
        if trend_available && history_len >= 2 {
            Strategy::Trend
        } else {
            Strategy::Naive
        }
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Strategy::Trend => f.write_str("trend"),
            Strategy::Naive => f.write_str("naive"),
        }
    }
}

/// Forecast for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub product: ProductId,
    /// Strategy that produced `points` (after any fallback).
    pub strategy: Strategy,
    /// Set when the trend model was selected but failed.
    pub fallback_reason: Option<String>,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn fell_back(&self) -> bool {
        self.fallback_reason.is_some()
    }

    pub fn predicted_total(&self) -> u64 {
        self.points.iter().map(|p| p.predicted_quantity).sum()
    }
}
