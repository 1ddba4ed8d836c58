//! Order workflow orchestration (application-level).
//!
//! `OrderWorkflow` coordinates one logical unit of work per request:
//! catalog resolution, ledger reservation, aggregate construction,
//! persistence, and lifecycle-event emission. It composes the collaborator
//! ports and contains no IO of its own.
//!
//! ## Creation flow
//!
//! ```text
//! validate input (empty list, quantities)
//!   -> user existence check
//!   -> batch catalog lookup (missing ids by set difference)
//!   -> advisory stock pre-check across all lines
//!   -> authoritative per-line reservation (rollback on any failure)
//!   -> build aggregate, persist
//!   -> emit creation event (best-effort, never fails the request)
//! ```
//!
//! A status update re-enters at the transition table only: load, check the
//! table, persist, apply cancellation's stock release, emit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use shop_core::UserId;
use shop_events::{EventPublisher, EventSink};
use shop_inventory::{InventoryLedger, LedgerError};
use shop_orders::{
    LineRequest, Order, OrderError, OrderId, OrderLifecycleEvent, OrderPlaced, OrderStatus,
    OrderStatusChanged,
};
use shop_products::{ProductId, ProductSnapshot};

use crate::ports::{CatalogLookup, OrderStore, UserDirectory};

/// Workflow-level failure.
///
/// The first four variants are distinct, recoverable business-rule
/// failures ("your request is invalid"); `Infrastructure` wraps any
/// collaborator failure ("try again later") so callers can tell the two
/// apart. Event-publication failures never appear here at all.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Stock(#[from] LedgerError),

    #[error("infrastructure failure: {0}")]
    Infrastructure(#[from] anyhow::Error),
}

/// Coordinates catalog, users, ledger, store, and publisher as one unit of
/// work per request. All dependencies are injected at construction; there
/// is no ambient lookup.
#[derive(Debug)]
pub struct OrderWorkflow<C, U, S, K> {
    catalog: C,
    users: U,
    store: S,
    ledger: Arc<InventoryLedger>,
    publisher: EventPublisher<K>,
}

impl<C, U, S, K> OrderWorkflow<C, U, S, K>
where
    C: CatalogLookup,
    U: UserDirectory,
    S: OrderStore,
    K: EventSink,
{
    pub fn new(
        catalog: C,
        users: U,
        store: S,
        ledger: Arc<InventoryLedger>,
        publisher: EventPublisher<K>,
    ) -> Self {
        Self {
            catalog,
            users,
            store,
            ledger,
            publisher,
        }
    }

    /// Create an order: validate, reserve stock all-or-nothing, persist,
    /// and emit the creation event.
    pub fn create_order(
        &self,
        user_id: UserId,
        items: &[LineRequest],
    ) -> Result<Order, WorkflowError> {
        info!(%user_id, lines = items.len(), "creating order");

        if items.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }
        if let Some(bad) = items.iter().find(|r| r.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: bad.product_id,
            }
            .into());
        }

        if !self.users.exists(user_id)? {
            error!(%user_id, "user not found");
            return Err(WorkflowError::UserNotFound(user_id));
        }

        // One batch lookup; absent ids are detected by set difference.
        let mut distinct: Vec<ProductId> = Vec::new();
        for item in items {
            if !distinct.contains(&item.product_id) {
                distinct.push(item.product_id);
            }
        }
        let snapshots: HashMap<ProductId, ProductSnapshot> = self
            .catalog
            .products(&distinct)?
            .into_iter()
            .map(|snapshot| (snapshot.id, snapshot))
            .collect();
        let missing: Vec<ProductId> = distinct
            .iter()
            .copied()
            .filter(|id| !snapshots.contains_key(id))
            .collect();
        if !missing.is_empty() {
            error!(?missing, "order references unknown products");
            return Err(OrderError::ProductNotFound(missing).into());
        }

        // Advisory pre-check across every line before reserving anything:
        // a single shortfall rejects the whole order with no reservation
        // made. The ledger remains the authority (step below).
        for item in items {
            let snapshot = &snapshots[&item.product_id];
            if !snapshot.has_stock_for(item.quantity) {
                error!(
                    product_id = %item.product_id,
                    available = snapshot.available,
                    requested = item.quantity,
                    "insufficient stock"
                );
                return Err(LedgerError::InsufficientStock {
                    product_id: item.product_id,
                    available: snapshot.available,
                    requested: item.quantity,
                }
                .into());
            }
        }

        // Authoritative reservation, all-or-nothing: a failure here means a
        // race won between pre-check and now, and everything already taken
        // for this order is given back.
        let mut reserved: Vec<(ProductId, u32)> = Vec::with_capacity(items.len());
        for item in items {
            if let Err(e) = self.ledger.reserve(item.product_id, item.quantity) {
                self.release_reserved(&reserved);
                return Err(e.into());
            }
            reserved.push((item.product_id, item.quantity));
        }

        let order = match Order::build(user_id, items, &snapshots, Utc::now()) {
            Ok(order) => order,
            Err(e) => {
                self.release_reserved(&reserved);
                return Err(e.into());
            }
        };

        // The order exists once the store accepts it; a failed write gives
        // the reservations back so inventory stays all-or-nothing.
        let order = match self.store.save(order) {
            Ok(order) => order,
            Err(e) => {
                self.release_reserved(&reserved);
                return Err(WorkflowError::Infrastructure(e));
            }
        };
        info!(order_id = %order.id_typed(), total = %order.total(), "order created");

        let event = OrderLifecycleEvent::Placed(OrderPlaced::from_order(&order));
        self.publisher
            .publish_best_effort(&order.id_typed().to_string(), &event);

        Ok(order)
    }

    /// Transition a persisted order to `next`.
    ///
    /// Cancellation releases every line's reserved quantity back to the
    /// ledger, exactly once; a second cancellation is rejected by the
    /// transition table before reaching the release.
    pub fn update_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, WorkflowError> {
        info!(%order_id, status = %next, "updating order status");

        let mut order = self
            .store
            .find_by_id(order_id)?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;

        order.transition(next, Utc::now())?;
        let order = self.store.save(order)?;

        if next == OrderStatus::Canceled {
            for line in order.lines() {
                self.ledger.release(line.product_id(), line.quantity())?;
            }
            info!(order_id = %order.id_typed(), "order canceled, stock released");
        }

        let event = OrderLifecycleEvent::StatusChanged(OrderStatusChanged::from_order(&order));
        self.publisher
            .publish_best_effort(&order.id_typed().to_string(), &event);

        Ok(order)
    }

    /// Read path.
    pub fn order(&self, order_id: OrderId) -> Result<Order, WorkflowError> {
        self.store
            .find_by_id(order_id)?
            .ok_or(WorkflowError::OrderNotFound(order_id))
    }

    fn release_reserved(&self, reserved: &[(ProductId, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.ledger.release(*product_id, *quantity) {
                error!(%product_id, error = %e, "failed to roll back reservation");
            }
        }
    }
}
