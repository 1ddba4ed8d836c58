//! In-memory collaborator implementations for tests/dev.
//!
//! Not optimized for performance; the point is faithful contracts: the
//! catalog omits unknown ids, reports availability straight from the
//! shared ledger, and the store is atomic per order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use shop_core::{Money, UserId};
use shop_inventory::InventoryLedger;
use shop_orders::{Order, OrderId};
use shop_products::{ProductId, ProductSnapshot};

use crate::ports::{CatalogLookup, OrderStore, UserDirectory};

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    unit_price: Money,
}

/// In-memory product catalog.
///
/// Availability is read live from the shared [`InventoryLedger`], the way
/// the real catalog row carries the current stock quantity.
#[derive(Debug)]
pub struct InMemoryCatalog {
    ledger: Arc<InventoryLedger>,
    entries: RwLock<HashMap<ProductId, CatalogEntry>>,
}

impl InMemoryCatalog {
    pub fn new(ledger: Arc<InventoryLedger>) -> Self {
        Self {
            ledger,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a product and seed its available stock.
    pub fn add_product(
        &self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        stock: u32,
    ) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                CatalogEntry {
                    name: name.into(),
                    unit_price,
                },
            );
        self.ledger.set_stock(id, stock);
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn products(&self, ids: &[ProductId]) -> anyhow::Result<Vec<ProductSnapshot>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .filter_map(|id| {
                entries.get(id).map(|entry| ProductSnapshot {
                    id: *id,
                    name: entry.name.clone(),
                    unit_price: entry.unit_price,
                    available: self.ledger.available(*id),
                })
            })
            .collect())
    }
}

/// In-memory user directory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashSet<UserId>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user_id: UserId) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn exists(&self, user_id: UserId) -> anyhow::Result<bool> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user_id))
    }
}

/// In-memory order store; each save replaces the whole order under one
/// lock, so writes are atomic at single-order granularity.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: Order) -> anyhow::Result<Order> {
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order.id_typed(), order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: OrderId) -> anyhow::Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }
}
