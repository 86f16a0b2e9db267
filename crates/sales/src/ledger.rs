//! In-memory, append-only record of sale events.

use serde::Serialize;

use shelfcast_core::{DomainResult, ProductId};

use crate::event::SaleEvent;
use crate::series::{DailySeries, checked_total};

/// A sale as stored by the ledger, tagged with its append position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedSale {
    /// 1-based, strictly increasing in append order.
    pub sequence: u64,
    pub event: SaleEvent,
}

/// Append-only sale ledger for one session.
///
/// Source of truth for every derived view (daily series, summaries, exports).
/// Events are never edited or removed once recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesLedger {
    entries: Vec<RecordedSale>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sale and return its sequence number.
    pub fn record(&mut self, event: SaleEvent) -> u64 {
        let sequence = self.entries.len() as u64 + 1;
        tracing::debug!(
            sequence,
            product = %event.product,
            date = %event.date,
            quantity = event.quantity,
            "sale recorded"
        );
        self.entries.push(RecordedSale { sequence, event });
        sequence
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RecordedSale] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &SaleEvent> + '_ {
        self.entries.iter().map(|e| &e.event)
    }

    /// Distinct products in first-seen order.
    pub fn products(&self) -> Vec<ProductId> {
        let mut seen: Vec<ProductId> = Vec::new();
        for event in self.events() {
            if !seen.contains(&event.product) {
                seen.push(event.product.clone());
            }
        }
        seen
    }

    pub fn events_for<'a>(&'a self, product: &'a ProductId) -> impl Iterator<Item = &'a SaleEvent> + 'a {
        self.events().filter(move |e| &e.product == product)
    }

    /// Units sold of `product`; `Validation` if the total does not fit in `u64`.
    pub fn total_for(&self, product: &ProductId) -> DomainResult<u64> {
        checked_total(self.events_for(product).map(|e| e.quantity), product)
    }

    /// Daily series for `product`; `InsufficientData` if it has never sold.
    pub fn daily_series(&self, product: &ProductId) -> DomainResult<DailySeries> {
        DailySeries::build(product, self.events_for(product))
    }
}

impl Extend<SaleEvent> for SalesLedger {
    fn extend<T: IntoIterator<Item = SaleEvent>>(&mut self, iter: T) {
        for event in iter {
            self.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shelfcast_core::DomainError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn product(name: &str) -> ProductId {
        ProductId::new(name).unwrap()
    }

    fn seeded() -> SalesLedger {
        let mut ledger = SalesLedger::new();
        ledger.record(SaleEvent::new(day(1), product("Milk"), 3));
        ledger.record(SaleEvent::new(day(1), product("Bread"), 1));
        ledger.record(SaleEvent::new(day(2), product("Milk"), 5));
        ledger.record(SaleEvent::new(day(4), product("Milk"), 2));
        ledger
    }

    #[test]
    fn sequence_numbers_follow_append_order() {
        let ledger = seeded();
        let sequences: Vec<u64> = ledger.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn products_are_distinct_in_first_seen_order() {
        let ledger = seeded();
        assert_eq!(ledger.products(), vec![product("Milk"), product("Bread")]);
    }

    #[test]
    fn totals_and_series_agree() {
        let ledger = seeded();
        let milk = product("Milk");
        assert_eq!(ledger.total_for(&milk).unwrap(), 10);

        let series = ledger.daily_series(&milk).unwrap();
        assert_eq!(series.quantities(), &[3, 5, 0, 2]);
        assert_eq!(series.total().unwrap(), ledger.total_for(&milk).unwrap());
    }

    #[test]
    fn unknown_product_has_insufficient_data() {
        let ledger = seeded();
        let err = ledger.daily_series(&product("Juice")).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientData(_)));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let mut ledger = SalesLedger::new();
        let max_raw = i64::MAX;
        for d in 1..=3 {
            ledger.record(SaleEvent::from_raw(day(d), "Milk", max_raw).unwrap());
        }
        let err = ledger.total_for(&product("Milk")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(matches!(
            ledger.daily_series(&product("Milk")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn extend_records_each_event() {
        let mut ledger = SalesLedger::new();
        ledger.extend(vec![
            SaleEvent::new(day(1), product("Rice"), 2),
            SaleEvent::new(day(3), product("Rice"), 4),
        ]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_for(&product("Rice")).unwrap(), 6);
    }
}
