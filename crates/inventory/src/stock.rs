use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shelfcast_core::{DomainError, DomainResult, ProductId};

/// Current stock per product, as counted by the shopkeeper.
///
/// Products without an entry have a stock of `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLevels(BTreeMap<ProductId, u64>);

impl StockLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stock count; negative counts are rejected.
    pub fn set(&mut self, product: ProductId, units: i64) -> DomainResult<()> {
        let units = u64::try_from(units).map_err(|_| {
            DomainError::validation(format!("stock of {product} cannot be negative: {units}"))
        })?;
        tracing::debug!(product = %product, units, "stock updated");
        self.0.insert(product, units);
        Ok(())
    }

    pub fn get(&self, product: &ProductId) -> u64 {
        self.0.get(product).copied().unwrap_or(0)
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        self.0.contains_key(product)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u64)> + '_ {
        self.0.iter().map(|(p, u)| (p, *u))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ProductId, u64)> for StockLevels {
    fn from_iter<T: IntoIterator<Item = (ProductId, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
