//! Read-only reports over a session: forecasts, dashboard, chart data.

use chrono::NaiveDate;

use shelfcast_core::ProductId;

use crate::commands::CommandResult;
use crate::session::Session;

pub fn forecast(session: &Session, product: Option<&str>) -> CommandResult {
    let result = match product {
        Some(name) => ProductId::new(name)
            .and_then(|p| session.forecast_product(&p))
            .map(|f| vec![f]),
        None => session.forecast_all(),
    };

    match result {
        Ok(forecasts) => {
            let fallbacks = forecasts.iter().filter(|f| f.forecast.fell_back()).count();
            CommandResult::success(
                "forecast",
                format!(
                    "forecast {} product(s) over {} day(s); {fallbacks} used the fallback after a model failure",
                    forecasts.len(),
                    session.settings().forecast_horizon_days
                ),
                forecasts,
            )
        }
        Err(e) => CommandResult::domain_failure("forecast", &e),
    }
}

pub fn dashboard(session: &Session, today: NaiveDate) -> CommandResult {
    match session.dashboard(today) {
        Ok(rows) => {
            let attention = rows.iter().filter(|r| r.health.needs_restock()).count();
            CommandResult::success(
                "dashboard",
                format!(
                    "{} product(s), {attention} need restocking (window {} day(s) ending {today})",
                    rows.len(),
                    session.settings().recent_window_days
                ),
                rows,
            )
        }
        Err(e) => CommandResult::domain_failure("dashboard", &e),
    }
}

pub fn chart(session: &Session, product: &str, history_days: usize) -> CommandResult {
    match ProductId::new(product).and_then(|p| session.chart_data(&p, history_days)) {
        Ok(chart) => CommandResult::success(
            "chart",
            format!(
                "{} history point(s), {} forecast point(s)",
                chart.history.len(),
                chart.forecast.len()
            ),
            chart,
        ),
        Err(e) => CommandResult::domain_failure("chart", &e),
    }
}
