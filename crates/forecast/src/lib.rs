//! `shelfcast-forecast`
//!
//! **Responsibility:** turn a product's daily sales series into an N-day-ahead
//! demand forecast.
//!
//! - Two strategies: a trend + weekly-seasonality model and a moving-average
//!   fallback. The engine picks one per call.
//! - A forecast is always produced; model failures are logged and replaced by
//!   the fallback, never returned to the caller.
//! - Does not touch the ledger or stock; inputs are plain [`DailySeries`] values.
//!
//! [`DailySeries`]: shelfcast_sales::DailySeries

pub mod engine;
pub mod error;
pub mod model;
pub mod naive;
pub mod point;
pub mod trend;

pub use engine::{EngineConfig, ForecastEngine};
pub use error::ForecastError;
pub use model::DemandModel;
pub use naive::NaiveModel;
pub use point::{Forecast, ForecastPoint, Strategy};
pub use trend::TrendModel;
