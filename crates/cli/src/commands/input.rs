//! Loading a session's starting data from JSON files.
//!
//! Files are read once at session start; nothing is written back.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;

use shelfcast_core::ProductId;
use shelfcast_sales::SaleEvent;

use crate::config::Settings;
use crate::session::Session;

#[derive(Debug, Deserialize)]
struct RawSale {
    date: NaiveDate,
    product: String,
    quantity: i64,
}

/// Sales file: a JSON array of `{"date": "YYYY-MM-DD", "product": "...", "quantity": n}`.
pub fn load_sales(path: &Path) -> anyhow::Result<Vec<SaleEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read sales file {}", path.display()))?;
    parse_sales(&text).with_context(|| format!("invalid sales file {}", path.display()))
}

pub fn parse_sales(text: &str) -> anyhow::Result<Vec<SaleEvent>> {
    let raw: Vec<RawSale> = serde_json::from_str(text)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            SaleEvent::from_raw(r.date, &r.product, r.quantity)
                .with_context(|| format!("sale #{}", i + 1))
        })
        .collect()
}

/// Stock file: a JSON object mapping product to units on hand.
pub fn load_stock(path: &Path) -> anyhow::Result<Vec<(ProductId, i64)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read stock file {}", path.display()))?;
    parse_stock(&text).with_context(|| format!("invalid stock file {}", path.display()))
}

pub fn parse_stock(text: &str) -> anyhow::Result<Vec<(ProductId, i64)>> {
    let raw: BTreeMap<String, i64> = serde_json::from_str(text)?;
    raw.into_iter()
        .map(|(name, units)| -> anyhow::Result<(ProductId, i64)> {
            let product = ProductId::new(&name).with_context(|| format!("stock entry {name:?}"))?;
            Ok((product, units))
        })
        .collect()
}

/// Fresh session seeded from the optional sales and stock files.
pub fn open_session(
    settings: Settings,
    sales: Option<&Path>,
    stock: Option<&Path>,
) -> anyhow::Result<Session> {
    let mut session = Session::new(settings);

    if let Some(path) = sales {
        let events = load_sales(path)?;
        tracing::info!(path = %path.display(), sales = events.len(), "sales loaded");
        session.record_sales(events);
    }

    if let Some(path) = stock {
        for (product, units) in load_stock(path)? {
            session
                .set_stock(product, units)
                .with_context(|| format!("invalid stock file {}", path.display()))?;
        }
    }

    Ok(session)
}
