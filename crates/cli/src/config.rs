//! Runtime settings (environment first, command-line overrides on top).

use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

use shelfcast_forecast::EngineConfig;
use shelfcast_inventory::{InventorySummarizer, OrderCostParams, ReorderAdvisor};

pub const ENV_HORIZON: &str = "SHELFCAST_FORECAST_HORIZON_DAYS";
pub const ENV_LEAD_TIME: &str = "SHELFCAST_LEAD_TIME_DAYS";
pub const ENV_RECENT_WINDOW: &str = "SHELFCAST_RECENT_WINDOW_DAYS";
pub const ENV_TREND_MODEL: &str = "SHELFCAST_TREND_MODEL";
pub const ENV_ORDERING_COST: &str = "SHELFCAST_ORDERING_COST";
pub const ENV_HOLDING_COST: &str = "SHELFCAST_HOLDING_COST";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid order cost: {0}")]
    InvalidCost(String),
}

/// Forecast, reorder and dashboard parameters for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub forecast_horizon_days: u32,
    pub lead_time_days: u32,
    pub recent_window_days: u32,
    pub trend_enabled: bool,
    pub costs: OrderCostParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            forecast_horizon_days: 7,
            lead_time_days: 3,
            recent_window_days: 30,
            trend_enabled: true,
            costs: OrderCostParams::default(),
        }
    }
}

impl Settings {
    pub const HORIZON_RANGE: RangeInclusive<u32> = 3..=60;
    pub const LEAD_TIME_RANGE: RangeInclusive<u32> = 1..=14;
    pub const RECENT_WINDOW_RANGE: RangeInclusive<u32> = 7..=90;

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; unset or unparsable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            forecast_horizon_days: read(&lookup, ENV_HORIZON, defaults.forecast_horizon_days),
            lead_time_days: read(&lookup, ENV_LEAD_TIME, defaults.lead_time_days),
            recent_window_days: read(&lookup, ENV_RECENT_WINDOW, defaults.recent_window_days),
            trend_enabled: read(&lookup, ENV_TREND_MODEL, defaults.trend_enabled),
            costs: OrderCostParams {
                ordering_cost: read(&lookup, ENV_ORDERING_COST, defaults.costs.ordering_cost),
                holding_cost: read(&lookup, ENV_HOLDING_COST, defaults.costs.holding_cost),
            },
        }
    }

    /// Enforce the ranges the engine is meant to be driven with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("forecast_horizon_days", self.forecast_horizon_days, Self::HORIZON_RANGE)?;
        check_range("lead_time_days", self.lead_time_days, Self::LEAD_TIME_RANGE)?;
        check_range("recent_window_days", self.recent_window_days, Self::RECENT_WINDOW_RANGE)?;
        self.costs
            .validate()
            .map_err(|e| ConfigError::InvalidCost(e.to_string()))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            trend_enabled: self.trend_enabled,
            ..EngineConfig::default()
        }
    }

    pub fn advisor(&self) -> ReorderAdvisor {
        ReorderAdvisor::new(self.lead_time_days).with_costs(self.costs)
    }

    pub fn summarizer(&self) -> InventorySummarizer {
        InventorySummarizer::new(i64::from(self.recent_window_days), self.lead_time_days)
    }
}

fn read<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "unparsable setting; using default");
            default
        }),
    }
}

fn check_range(name: &'static str, value: u32, range: RangeInclusive<u32>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
