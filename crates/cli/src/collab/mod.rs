//! Boundaries to the collaborators that render or ship engine output.
//!
//! The engine hands them plain data and gets back a success/failure outcome;
//! nothing they do feeds back into the ledger or forecasts.

pub mod chart;
pub mod export;
pub mod notify;

pub use chart::ChartData;
pub use export::{ExportOutcome, ExportSink, ExportTables, JsonExportSink, SaleRow};
pub use notify::{LogNotifier, NotificationOutcome, Notifier};
