//! Per-user session state: one ledger, one stock map, one set of settings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;
use serde::Serialize;

use shelfcast_core::{DomainError, DomainResult, ProductId, SessionId};
use shelfcast_forecast::{Forecast, ForecastEngine};
use shelfcast_inventory::{LowStockNotice, ProductSummary, ReorderAdvice, ReorderAdvisor, StockLevels};
use shelfcast_sales::{DailySeries, SaleEvent, SalesLedger};

use crate::collab::chart::ChartData;
use crate::collab::export::ExportTables;
use crate::config::Settings;

/// Forecast-based view of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForecast {
    pub history_days: usize,
    pub forecast: Forecast,
    pub advice: ReorderAdvice,
    /// Illustrative order-quantity suggestion.
    pub order_quantity: f64,
}

/// Everything one shopkeeper works with between session start and end.
///
/// Sales and stock are mutated only through `&mut self` methods, so a session
/// is never shared without a lock around it (see [`SessionRegistry`]).
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    settings: Settings,
    engine: ForecastEngine,
    ledger: SalesLedger,
    stock: StockLevels,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_id(SessionId::new(), settings)
    }

    pub fn with_id(id: SessionId, settings: Settings) -> Self {
        tracing::info!(session_id = %id, "session started");
        Self {
            id,
            engine: ForecastEngine::new(settings.engine_config()),
            settings,
            ledger: SalesLedger::new(),
            stock: StockLevels::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    pub fn stock(&self) -> &StockLevels {
        &self.stock
    }

    pub fn record_sale(&mut self, event: SaleEvent) -> u64 {
        self.ledger.record(event)
    }

    pub fn record_sales(&mut self, events: impl IntoIterator<Item = SaleEvent>) {
        self.ledger.extend(events);
    }

    pub fn set_stock(&mut self, product: ProductId, units: i64) -> DomainResult<()> {
        self.stock.set(product, units)
    }

    /// Forecast and forecast-based reorder advice for one product.
    ///
    /// `InsufficientData` if the product has no sales; callers skip it.
    pub fn forecast_product(&self, product: &ProductId) -> DomainResult<ProductForecast> {
        let series = self.ledger.daily_series(product)?;
        self.forecast_series(&series)
    }

    /// Forecasts for every product with sales, in first-seen order.
    pub fn forecast_all(&self) -> DomainResult<Vec<ProductForecast>> {
        self.ledger
            .products()
            .iter()
            .map(|product| self.forecast_product(product))
            .collect()
    }

    fn forecast_series(&self, series: &DailySeries) -> DomainResult<ProductForecast> {
        let horizon = self.settings.forecast_horizon_days as usize;
        let forecast = self
            .engine
            .forecast(series, horizon)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let advisor = self.settings.advisor();
        let demand = ReorderAdvisor::forecast_demand(&forecast.points);
        let advice = advisor.advise_units(series.product(), demand, self.stock.get(series.product()))?;
        let order_quantity = advisor.order_quantity(advice.avg_daily_demand)?;

        Ok(ProductForecast {
            history_days: series.len(),
            forecast,
            advice,
            order_quantity,
        })
    }

    /// Window-based summaries for every product (dashboard view).
    pub fn dashboard(&self, today: NaiveDate) -> DomainResult<Vec<ProductSummary>> {
        self.settings
            .summarizer()
            .summarize(self.ledger.events(), &self.stock, today)
    }

    /// History tail and forecast for the chart collaborator.
    pub fn chart_data(&self, product: &ProductId, history_days: usize) -> DomainResult<ChartData> {
        let series = self.ledger.daily_series(product)?;
        let forecast = self.forecast_series(&series)?.forecast;
        Ok(ChartData::new(&series, history_days, forecast.points))
    }

    /// Raw sales plus dashboard summary for the export collaborator.
    pub fn export_tables(&self, today: NaiveDate) -> DomainResult<ExportTables> {
        Ok(ExportTables::new(self.ledger.events(), self.dashboard(today)?))
    }

    /// Notices for every product whose forecast-based health needs a restock.
    pub fn low_stock_notices(&self) -> DomainResult<Vec<LowStockNotice>> {
        Ok(self
            .forecast_all()?
            .iter()
            .filter_map(|p| p.advice.low_stock_notice())
            .collect())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::info!(session_id = %self.id, sales = self.ledger.len(), "session ended");
    }
}

/// Live sessions keyed by id. Each session sits behind its own mutex, so
/// mutations within a session are serialized and sessions never share state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    settings: Settings,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn start(&self) -> DomainResult<SessionId> {
        let session = Session::new(self.settings);
        let id = session.id();
        let mut map = self
            .sessions
            .write()
            .map_err(|_| DomainError::invariant("session registry lock poisoned"))?;
        map.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Drop a session and everything recorded in it.
    pub fn end(&self, id: SessionId) -> DomainResult<()> {
        let mut map = self
            .sessions
            .write()
            .map_err(|_| DomainError::invariant("session registry lock poisoned"))?;
        map.remove(&id).map(|_| ()).ok_or_else(DomainError::not_found)
    }

    /// Run `f` with exclusive access to one session.
    pub fn with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> DomainResult<R> {
        let session = {
            let map = self
                .sessions
                .read()
                .map_err(|_| DomainError::invariant("session registry lock poisoned"))?;
            map.get(&id).cloned().ok_or_else(DomainError::not_found)?
        };
        let mut guard = session
            .lock()
            .map_err(|_| DomainError::invariant(format!("session {id} lock poisoned")))?;
        Ok(f(&mut guard))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
