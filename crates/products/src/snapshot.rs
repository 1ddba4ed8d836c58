use serde::{Deserialize, Serialize};

use shop_core::{AggregateId, Money, ValueObject};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Read-only view of one catalog product, captured at order time.
///
/// `available` reflects the catalog's stock quantity at lookup time. It is
/// advisory only; the inventory ledger is the authority on whether a
/// reservation actually succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: Money,
    pub available: u32,
}

impl ProductSnapshot {
    /// Advisory stock check against the snapshot's availability.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        quantity <= self.available
    }
}

impl ValueObject for ProductSnapshot {}
