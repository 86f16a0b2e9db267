//! Inventory decisions (reorder advice, stock health, dashboard summaries).
//!
//! Pure functions over sales history, forecasts and the shopkeeper's stock
//! counts (no IO, no mutation of inputs).

pub mod advice;
pub mod stock;
pub mod summary;

pub use advice::{LowStockNotice, OrderCostParams, ReorderAdvice, ReorderAdvisor, StockHealth};
pub use stock::StockLevels;
pub use summary::{InventorySummarizer, ProductSummary};
