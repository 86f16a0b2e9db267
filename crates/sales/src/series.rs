//! Daily-frequency view of a product's sales.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use shelfcast_core::{DomainError, DomainResult, ProductId, ValueObject};

use crate::event::SaleEvent;

/// One calendar day of a [`DailySeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub quantity: u64,
}

impl ValueObject for DailyPoint {}

/// Gap-filled daily series for one product.
///
/// Invariant: one entry per calendar day from `start` to `end` inclusive, in
/// order, with days without sales holding `0`. Dates are never stored per entry,
/// so they cannot drift, repeat or skip.
///
/// An empty series still has an `end` (the as-of date) so that forecasts built
/// from it have somewhere to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    product: ProductId,
    start: NaiveDate,
    end: NaiveDate,
    quantities: Vec<u64>,
}

impl DailySeries {
    /// Build the series from every sale event of one product.
    ///
    /// Events are grouped by date (summing quantities), sorted, and reindexed
    /// onto a complete calendar between the first and last sale date.
    ///
    /// Fails with [`DomainError::InsufficientData`] when `events` is empty and
    /// with [`DomainError::Validation`] when an event belongs to another product.
    pub fn build<'a, I>(product: &ProductId, events: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = &'a SaleEvent>,
    {
        let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for event in events {
            if &event.product != product {
                return Err(DomainError::validation(format!(
                    "sale for {} passed to the series of {product}",
                    event.product
                )));
            }
            let day_total = by_date.entry(event.date).or_insert(0);
            *day_total = day_total
                .checked_add(event.quantity)
                .ok_or_else(|| DomainError::validation(format!("quantity total overflows for {product}")))?;
        }

        let (Some((&start, _)), Some((&end, _))) = (by_date.first_key_value(), by_date.last_key_value())
        else {
            return Err(DomainError::insufficient_data(format!(
                "no sales recorded for {product}"
            )));
        };

        let span = end.signed_duration_since(start).num_days() as u64;
        let quantities = calendar(start, span + 1)
            .map(|d| by_date.get(&d).copied().unwrap_or(0))
            .collect();

        let series = Self {
            product: product.clone(),
            start,
            end,
            quantities,
        };
        series.total()?;
        Ok(series)
    }

    /// Series with no history, anchored at `as_of` (forecasts start the day after).
    pub fn empty(product: ProductId, as_of: NaiveDate) -> Self {
        Self {
            product,
            start: as_of,
            end: as_of,
            quantities: Vec::new(),
        }
    }

    /// Series from already-daily quantities starting at `start`.
    pub fn from_quantities(
        product: ProductId,
        start: NaiveDate,
        quantities: Vec<u64>,
    ) -> DomainResult<Self> {
        let Some(span) = quantities.len().checked_sub(1) else {
            return Err(DomainError::insufficient_data(format!(
                "no daily quantities supplied for {product}"
            )));
        };
        let end = start
            .checked_add_days(Days::new(span as u64))
            .ok_or_else(|| DomainError::invariant("series extends past the calendar range"))?;
        let series = Self {
            product,
            start,
            end,
            quantities,
        };
        series.total()?;
        Ok(series)
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// First historical date, or `None` for an empty series.
    pub fn first_date(&self) -> Option<NaiveDate> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Last historical date (the as-of date for an empty series).
    pub fn last_date(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn quantities(&self) -> &[u64] {
        &self.quantities
    }

    pub fn points(&self) -> impl Iterator<Item = DailyPoint> + '_ {
        calendar(self.start, self.quantities.len() as u64)
            .zip(self.quantities.iter())
            .map(|(date, &quantity)| DailyPoint { date, quantity })
    }

    /// Sum of all daily quantities (equals the sum of the source events).
    ///
    /// Construction already rejects series whose total does not fit in `u64`.
    pub fn total(&self) -> DomainResult<u64> {
        checked_total(self.quantities.iter().copied(), &self.product)
    }

    /// The last `days` entries (fewer if the series is shorter).
    pub fn tail(&self, days: usize) -> Vec<DailyPoint> {
        let skip = self.len().saturating_sub(days);
        self.points().skip(skip).collect()
    }
}

/// `days` consecutive dates from `start`, including `NaiveDate::MAX` when reached.
fn calendar(start: NaiveDate, days: u64) -> impl Iterator<Item = NaiveDate> {
    (0..days).map_while(move |offset| start.checked_add_days(Days::new(offset)))
}

/// Sum of quantities, failing with `Validation` instead of wrapping.
pub fn checked_total<I>(quantities: I, product: &ProductId) -> DomainResult<u64>
where
    I: IntoIterator<Item = u64>,
{
    quantities.into_iter().try_fold(0u64, |acc, q| {
        acc.checked_add(q)
            .ok_or_else(|| DomainError::validation(format!("quantity total overflows for {product}")))
    })
}
