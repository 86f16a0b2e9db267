//! Sales domain module.
//!
//! Append-only record of unit sales per product and the daily-frequency view
//! every forecast is built from. Deterministic domain logic only (no IO).

pub mod event;
pub mod ledger;
pub mod series;

pub use event::SaleEvent;
pub use ledger::{RecordedSale, SalesLedger};
pub use series::{DailyPoint, DailySeries, checked_total};
