use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfcast_core::{DomainError, DomainResult, ProductId, ValueObject};

/// One sale fact: `quantity` units of `product` sold on `date`.
///
/// Several events may share a date and product; they are additive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub date: NaiveDate,
    pub product: ProductId,
    pub quantity: u64,
}

impl ValueObject for SaleEvent {}

impl SaleEvent {
    pub fn new(date: NaiveDate, product: ProductId, quantity: u64) -> Self {
        Self {
            date,
            product,
            quantity,
        }
    }

    /// Entry-form rule: a recorded sale must move at least one unit.
    pub fn new_positive(date: NaiveDate, product: ProductId, quantity: u64) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity sold must be at least 1"));
        }
        Ok(Self::new(date, product, quantity))
    }

    /// Boundary conversion from raw (possibly signed) input.
    pub fn from_raw(date: NaiveDate, product: &str, quantity: i64) -> DomainResult<Self> {
        let product = ProductId::new(product)?;
        let quantity = u64::try_from(quantity)
            .map_err(|_| DomainError::validation(format!("quantity cannot be negative: {quantity}")))?;
        Ok(Self::new(date, product, quantity))
    }
}
