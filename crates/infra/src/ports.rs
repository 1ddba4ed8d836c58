//! Collaborator ports consumed by the order workflow.
//!
//! These are the seams to the systems this core does not own: the product
//! catalog, the user directory, and the durable order store. Errors on
//! these traits are **infrastructure failures** ("try again later"),
//! reported through `anyhow`; business-rule failures are derived from the
//! returned data by the workflow (missing ids by set difference, unknown
//! user from the found/not-found answer).

use std::sync::Arc;

use shop_core::UserId;
use shop_orders::{Order, OrderId};
use shop_products::{ProductId, ProductSnapshot};

/// Batch product resolution.
pub trait CatalogLookup: Send + Sync {
    /// Snapshots for every id that exists; absent ids are simply omitted.
    fn products(&self, ids: &[ProductId]) -> anyhow::Result<Vec<ProductSnapshot>>;
}

/// User existence check.
pub trait UserDirectory: Send + Sync {
    fn exists(&self, user_id: UserId) -> anyhow::Result<bool>;
}

/// Durable order persistence, atomic at single-order granularity.
pub trait OrderStore: Send + Sync {
    /// Insert-or-update keyed by the order's id; returns the stored order.
    fn save(&self, order: Order) -> anyhow::Result<Order>;

    fn find_by_id(&self, id: OrderId) -> anyhow::Result<Option<Order>>;
}

impl<C> CatalogLookup for Arc<C>
where
    C: CatalogLookup + ?Sized,
{
    fn products(&self, ids: &[ProductId]) -> anyhow::Result<Vec<ProductSnapshot>> {
        (**self).products(ids)
    }
}

impl<U> UserDirectory for Arc<U>
where
    U: UserDirectory + ?Sized,
{
    fn exists(&self, user_id: UserId) -> anyhow::Result<bool> {
        (**self).exists(user_id)
    }
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn save(&self, order: Order) -> anyhow::Result<Order> {
        (**self).save(order)
    }

    fn find_by_id(&self, id: OrderId) -> anyhow::Result<Option<Order>> {
        (**self).find_by_id(id)
    }
}
