use serde::{Deserialize, Serialize};

use shelfcast_core::{DomainError, DomainResult, ProductId, ValueObject};
use shelfcast_forecast::ForecastPoint;

/// Coarse classification of stock against the reorder point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockHealth {
    /// Nothing left on the shelf.
    Critical,
    /// Below the reorder point.
    Low,
    Healthy,
}

impl StockHealth {
    /// `Critical` at zero stock, `Low` strictly below the reorder point,
    /// otherwise `Healthy` (stock equal to the reorder point is healthy).
    pub fn classify(current_stock: u64, reorder_point: f64) -> Self {
        if current_stock == 0 {
            StockHealth::Critical
        } else if (current_stock as f64) < reorder_point {
            StockHealth::Low
        } else {
            StockHealth::Healthy
        }
    }

    /// Whether a low-stock notification should go out.
    pub fn needs_restock(self) -> bool {
        matches!(self, StockHealth::Critical | StockHealth::Low)
    }
}

impl core::fmt::Display for StockHealth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockHealth::Critical => f.write_str("critical"),
            StockHealth::Low => f.write_str("low"),
            StockHealth::Healthy => f.write_str("healthy"),
        }
    }
}

/// Reorder decision for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderAdvice {
    pub product: ProductId,
    pub avg_daily_demand: f64,
    pub reorder_point: f64,
    pub current_stock: u64,
    pub health: StockHealth,
}

impl ValueObject for ReorderAdvice {}

impl ReorderAdvice {
    /// Notification payload when stock needs attention, `None` when healthy.
    pub fn low_stock_notice(&self) -> Option<LowStockNotice> {
        self.health.needs_restock().then(|| LowStockNotice {
            product: self.product.clone(),
            current_stock: self.current_stock,
            reorder_point: self.reorder_point,
            avg_daily_demand: self.avg_daily_demand,
        })
    }
}

/// What the notification collaborator needs to compose a low-stock message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockNotice {
    pub product: ProductId,
    pub current_stock: u64,
    pub reorder_point: f64,
    pub avg_daily_demand: f64,
}

/// Cost inputs of the order-quantity heuristic.
///
/// The defaults (50 per order, 1 per unit per year) are placeholders, not a
/// validated cost model; pass real costs for real decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderCostParams {
    pub ordering_cost: f64,
    pub holding_cost: f64,
}

impl Default for OrderCostParams {
    fn default() -> Self {
        Self {
            ordering_cost: 50.0,
            holding_cost: 1.0,
        }
    }
}

impl OrderCostParams {
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.ordering_cost.is_finite() && self.ordering_cost >= 0.0) {
            return Err(DomainError::validation(
                "ordering_cost must be a finite non-negative number",
            ));
        }
        if !(self.holding_cost.is_finite() && self.holding_cost > 0.0) {
            return Err(DomainError::validation(
                "holding_cost must be a finite positive number",
            ));
        }
        Ok(())
    }
}

/// Turns demand estimates into reorder points and stock health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderAdvisor {
    lead_time_days: u32,
    costs: OrderCostParams,
}

impl ReorderAdvisor {
    pub fn new(lead_time_days: u32) -> Self {
        Self {
            lead_time_days,
            costs: OrderCostParams::default(),
        }
    }

    pub fn with_costs(mut self, costs: OrderCostParams) -> Self {
        self.costs = costs;
        self
    }

    pub fn lead_time_days(&self) -> u32 {
        self.lead_time_days
    }

    /// Advice from a forecast: demand is the mean predicted quantity (0 for an
    /// empty forecast), reorder point is demand over the lead time.
    pub fn advise(
        &self,
        product: &ProductId,
        forecast: &[ForecastPoint],
        current_stock: i64,
    ) -> DomainResult<ReorderAdvice> {
        self.advise_from_demand(product, Self::forecast_demand(forecast), current_stock)
    }

    /// Mean predicted daily quantity, 0 for an empty forecast.
    pub fn forecast_demand(forecast: &[ForecastPoint]) -> f64 {
        if forecast.is_empty() {
            return 0.0;
        }
        forecast.iter().map(|p| p.predicted_quantity as f64).sum::<f64>() / forecast.len() as f64
    }

    /// Advice from an already-estimated average daily demand and a raw stock
    /// count, which must not be negative.
    pub fn advise_from_demand(
        &self,
        product: &ProductId,
        avg_daily_demand: f64,
        current_stock: i64,
    ) -> DomainResult<ReorderAdvice> {
        let current_stock = u64::try_from(current_stock).map_err(|_| {
            DomainError::validation(format!(
                "stock of {product} cannot be negative: {current_stock}"
            ))
        })?;
        self.advise_units(product, avg_daily_demand, current_stock)
    }

    /// Advice for a stock count that is already validated (e.g. read from
    /// [`StockLevels`](crate::StockLevels)).
    pub fn advise_units(
        &self,
        product: &ProductId,
        avg_daily_demand: f64,
        current_stock: u64,
    ) -> DomainResult<ReorderAdvice> {
        if !(avg_daily_demand.is_finite() && avg_daily_demand >= 0.0) {
            return Err(DomainError::validation(format!(
                "average daily demand of {product} must be finite and non-negative, got {avg_daily_demand}"
            )));
        }

        let reorder_point = avg_daily_demand * f64::from(self.lead_time_days);
        Ok(ReorderAdvice {
            product: product.clone(),
            avg_daily_demand,
            reorder_point,
            current_stock,
            health: StockHealth::classify(current_stock, reorder_point),
        })
    }

    /// Square-root order-quantity heuristic:
    /// `sqrt(2 * (avg_daily_demand * 365) * ordering_cost / holding_cost)`.
    ///
    /// Illustrative only; see [`OrderCostParams`].
    pub fn order_quantity(&self, avg_daily_demand: f64) -> DomainResult<f64> {
        self.costs.validate()?;
        if !(avg_daily_demand.is_finite() && avg_daily_demand >= 0.0) {
            return Err(DomainError::validation(
                "average daily demand must be finite and non-negative",
            ));
        }
        let annual_demand = avg_daily_demand * 365.0;
        Ok((2.0 * annual_demand * self.costs.ordering_cost / self.costs.holding_cost).sqrt())
    }
}
