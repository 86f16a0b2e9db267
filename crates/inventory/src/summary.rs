//! Dashboard-level aggregation across all products.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use shelfcast_core::{DomainError, DomainResult, ProductId};
use shelfcast_sales::SaleEvent;

use crate::advice::{ReorderAdvisor, StockHealth};
use crate::stock::StockLevels;

/// Per-product dashboard row. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: ProductId,
    pub total_sold: u64,
    pub recent_sold: u64,
    pub avg_daily_recent: f64,
    pub current_stock: u64,
    pub reorder_point: f64,
    pub health: StockHealth,
}

#[derive(Debug, Default, Clone, Copy)]
struct SalesTotals {
    total: u64,
    recent: u64,
}

/// Window-based summaries for every product seen in the sales history.
///
/// Demand here is `recent_sold / recent_window_days`, a cruder estimate than
/// the forecast mean used by [`ReorderAdvisor::advise`]. Both feed different
/// reports and are kept separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySummarizer {
    recent_window_days: u32,
    lead_time_days: u32,
}

impl InventorySummarizer {
    /// A window of zero (or less) days counts as one day.
    pub fn new(recent_window_days: i64, lead_time_days: u32) -> Self {
        let recent_window_days = u32::try_from(recent_window_days.max(1)).unwrap_or(u32::MAX);
        Self {
            recent_window_days,
            lead_time_days,
        }
    }

    pub fn recent_window_days(&self) -> u32 {
        self.recent_window_days
    }

    /// Whether `date` falls in the recent window ending on `today`
    /// (`today - window ..= today`, both ends inclusive).
    pub fn in_window(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let from = today
            .checked_sub_days(Days::new(u64::from(self.recent_window_days)))
            .unwrap_or(NaiveDate::MIN);
        date >= from && date <= today
    }

    /// One summary per distinct product in `events`, sorted by product.
    pub fn summarize<'a, I>(
        &self,
        events: I,
        stock: &StockLevels,
        today: NaiveDate,
    ) -> DomainResult<Vec<ProductSummary>>
    where
        I: IntoIterator<Item = &'a SaleEvent>,
    {
        let mut totals: BTreeMap<ProductId, SalesTotals> = BTreeMap::new();
        for event in events {
            let entry = totals.entry(event.product.clone()).or_default();
            entry.total = add_quantity(entry.total, event)?;
            if self.in_window(event.date, today) {
                entry.recent = add_quantity(entry.recent, event)?;
            }
        }

        let advisor = ReorderAdvisor::new(self.lead_time_days);
        let window = f64::from(self.recent_window_days);

        totals
            .into_iter()
            .map(|(product, sold)| -> DomainResult<ProductSummary> {
                let avg_daily_recent = sold.recent as f64 / window;
                let current_stock = stock.get(&product);
                let advice = advisor.advise_units(&product, avg_daily_recent, current_stock)?;
                Ok(ProductSummary {
                    product,
                    total_sold: sold.total,
                    recent_sold: sold.recent,
                    avg_daily_recent,
                    current_stock,
                    reorder_point: advice.reorder_point,
                    health: advice.health,
                })
            })
            .collect()
    }
}

fn add_quantity(sum: u64, event: &SaleEvent) -> DomainResult<u64> {
    sum.checked_add(event.quantity).ok_or_else(|| {
        DomainError::validation(format!("quantity total overflows for {}", event.product))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn product(name: &str) -> ProductId {
        ProductId::new(name).unwrap()
    }

    fn sale(d: u32, name: &str, quantity: u64) -> SaleEvent {
        SaleEvent::new(day(d), product(name), quantity)
    }

    #[test]
    fn recent_average_over_window() {
        let events = vec![sale(20, "Milk", 3), sale(22, "Milk", 5), sale(25, "Milk", 2)];
        let summarizer = InventorySummarizer::new(14, 3);

        let rows = summarizer.summarize(&events, &StockLevels::new(), day(25)).unwrap();
        assert_eq!(rows.len(), 1);
        let milk = &rows[0];
        assert_eq!(milk.total_sold, 10);
        assert_eq!(milk.recent_sold, 10);
        assert!((milk.avg_daily_recent - 10.0 / 14.0).abs() < 1e-12);
        assert!((milk.reorder_point - 3.0 * 10.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let summarizer = InventorySummarizer::new(7, 3);
        assert!(summarizer.in_window(day(3), day(10)));
        assert!(summarizer.in_window(day(10), day(10)));
        assert!(!summarizer.in_window(day(2), day(10)));
        assert!(!summarizer.in_window(day(11), day(10)));
    }

    #[test]
    fn old_sales_count_toward_total_only() {
        let events = vec![sale(1, "Bread", 9), sale(28, "Bread", 4)];
        let rows = InventorySummarizer::new(7, 3)
            .summarize(&events, &StockLevels::new(), day(30))
            .unwrap();
        assert_eq!(rows[0].total_sold, 13);
        assert_eq!(rows[0].recent_sold, 4);
    }

    #[test]
    fn products_without_recent_sales_still_classified() {
        let events = vec![sale(1, "Soap", 6)];
        let mut stock = StockLevels::new();
        stock.set(product("Soap"), 2).unwrap();

        let rows = InventorySummarizer::new(7, 3)
            .summarize(&events, &stock, day(30))
            .unwrap();
        assert_eq!(rows[0].recent_sold, 0);
        assert_eq!(rows[0].avg_daily_recent, 0.0);
        assert_eq!(rows[0].reorder_point, 0.0);
        assert_eq!(rows[0].health, StockHealth::Healthy);
    }

    #[test]
    fn missing_stock_defaults_to_zero_and_critical() {
        let events = vec![sale(29, "Juice", 2)];
        let rows = InventorySummarizer::new(7, 3)
            .summarize(&events, &StockLevels::new(), day(30))
            .unwrap();
        assert_eq!(rows[0].current_stock, 0);
        assert_eq!(rows[0].health, StockHealth::Critical);
    }

    #[test]
    fn non_positive_window_counts_as_one_day() {
        let summarizer = InventorySummarizer::new(0, 3);
        assert_eq!(summarizer.recent_window_days(), 1);
        assert_eq!(InventorySummarizer::new(-4, 3).recent_window_days(), 1);

        let events = vec![sale(30, "Rice", 5)];
        let rows = summarizer.summarize(&events, &StockLevels::new(), day(30)).unwrap();
        assert_eq!(rows[0].avg_daily_recent, 5.0);
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let events = vec![sale(30, "Milk", u64::MAX), sale(30, "Milk", 1)];
        let err = InventorySummarizer::new(7, 3)
            .summarize(&events, &StockLevels::new(), day(30))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Outside the window only the lifetime total can overflow.
        let old = vec![sale(1, "Milk", u64::MAX), sale(2, "Milk", 1)];
        assert!(InventorySummarizer::new(7, 3)
            .summarize(&old, &StockLevels::new(), day(30))
            .is_err());
    }

    #[test]
    fn large_stock_counts_are_reported_exactly() {
        let events = vec![sale(30, "Milk", 1)];
        let stock: StockLevels = [(product("Milk"), u64::MAX)].into_iter().collect();
        let rows = InventorySummarizer::new(7, 3)
            .summarize(&events, &stock, day(30))
            .unwrap();
        assert_eq!(rows[0].current_stock, u64::MAX);
        assert_eq!(rows[0].health, StockHealth::Healthy);
    }

    #[test]
    fn one_row_per_product_sorted() {
        let events = vec![
            sale(28, "Milk", 1),
            sale(29, "Bread", 2),
            sale(30, "Milk", 3),
            sale(30, "Tissue", 1),
        ];
        let mut stock = StockLevels::new();
        stock.set(product("Milk"), 100).unwrap();
        stock.set(product("Chocolate"), 5).unwrap();

        let rows = InventorySummarizer::new(7, 3)
            .summarize(&events, &stock, day(30))
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["Bread", "Milk", "Tissue"]);
        assert_eq!(rows[1].current_stock, 100);
        assert_eq!(rows[1].health, StockHealth::Healthy);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: summarizing twice yields identical rows and leaves inputs untouched.
            #[test]
            fn summarize_is_idempotent(
                sales in prop::collection::vec((0usize..4, 1u32..29, 0u64..50), 0..40),
                window in -3i64..90,
            ) {
                let names = ["Milk", "Bread", "Oil", "Salt"];
                let events: Vec<SaleEvent> = sales
                    .iter()
                    .map(|(p, d, q)| sale(*d, names[*p], *q))
                    .collect();
                let events_before = events.clone();
                let mut stock = StockLevels::new();
                stock.set(product("Milk"), 10).unwrap();
                let stock_before = stock.clone();

                let summarizer = InventorySummarizer::new(window, 3);
                let first = summarizer.summarize(&events, &stock, day(29)).unwrap();
                let second = summarizer.summarize(&events, &stock, day(29)).unwrap();

                prop_assert_eq!(&first, &second);
                prop_assert_eq!(&events, &events_before);
                prop_assert_eq!(&stock, &stock_before);

                let total: u64 = events.iter().map(|e| e.quantity).sum();
                prop_assert_eq!(first.iter().map(|r| r.total_sold).sum::<u64>(), total);
            }
        }
    }
}
