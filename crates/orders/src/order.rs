use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shop_core::{AggregateId, Entity, Money, UserId, ValueObject};
use shop_products::{ProductId, ProductSnapshot};

use crate::error::OrderError;
use crate::status::OrderStatus;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One product+quantity request submitted by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Order line: product, quantity, and the unit price captured from the
/// catalog at order time. Owned exclusively by its parent order; prices on
/// existing lines never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl OrderLineItem {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

impl ValueObject for OrderLineItem {}

/// Aggregate root: Order.
///
/// Created atomically with all its line items; afterwards the only legal
/// mutation is a status transition. The total is derived from the lines at
/// build time by an explicit function, never set by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    lines: Vec<OrderLineItem>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Build an order for `user_id` from the caller's line requests and the
    /// catalog snapshots resolved for them.
    ///
    /// One line per request, in submission order, with the unit price
    /// copied from the snapshot. Fails with [`OrderError::ProductNotFound`]
    /// enumerating **all** ids absent from `snapshots`. Performs no stock
    /// reservation; that is orchestrated separately so validation happens
    /// before any stock is touched.
    pub fn build(
        user_id: UserId,
        requests: &[LineRequest],
        snapshots: &HashMap<ProductId, ProductSnapshot>,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        if requests.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        if let Some(bad) = requests.iter().find(|r| r.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: bad.product_id,
            });
        }

        let mut missing: Vec<ProductId> = Vec::new();
        for request in requests {
            if !snapshots.contains_key(&request.product_id) && !missing.contains(&request.product_id)
            {
                missing.push(request.product_id);
            }
        }
        if !missing.is_empty() {
            return Err(OrderError::ProductNotFound(missing));
        }

        let lines: Vec<OrderLineItem> = requests
            .iter()
            .map(|request| OrderLineItem {
                product_id: request.product_id,
                quantity: request.quantity,
                unit_price: snapshots[&request.product_id].unit_price,
            })
            .collect();
        let total = derive_total(&lines);

        Ok(Order {
            id: OrderId::new(AggregateId::new()),
            user_id,
            lines,
            total,
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn lines(&self) -> &[OrderLineItem] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move the order to `next`, enforcing the transition table.
    ///
    /// On success the status and `updated_at` change; nothing else does.
    /// Cancellation's stock release is the workflow's side effect, applied
    /// after the transition is accepted and persisted.
    pub fn transition(&mut self, next: OrderStatus, now: DateTime<Utc>) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Total amount: sum of current line subtotals, nothing else.
fn derive_total(lines: &[OrderLineItem]) -> Money {
    lines.iter().map(OrderLineItem::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_user_id() -> UserId {
        UserId::new()
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn snapshot(id: ProductId, unit_price_minor: u64) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: format!("product-{id}"),
            unit_price: Money::from_minor_units(unit_price_minor),
            available: 100,
        }
    }

    fn snapshots_for(products: &[(ProductId, u64)]) -> HashMap<ProductId, ProductSnapshot> {
        products
            .iter()
            .map(|(id, price)| (*id, snapshot(*id, *price)))
            .collect()
    }

    fn built_order(requests: &[LineRequest], products: &[(ProductId, u64)]) -> Order {
        Order::build(test_user_id(), requests, &snapshots_for(products), test_time()).unwrap()
    }

    #[test]
    fn two_units_at_ten_total_twenty_with_status_new() {
        let p1 = test_product_id();
        let order = built_order(
            &[LineRequest {
                product_id: p1,
                quantity: 2,
            }],
            &[(p1, 1000)],
        );

        assert_eq!(order.total(), Money::from_minor_units(2000));
        assert_eq!(order.total().to_string(), "20.00");
        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].subtotal(), Money::from_minor_units(2000));
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn lines_keep_submission_order() {
        let products: Vec<_> = (0..3).map(|_| test_product_id()).collect();
        let requests: Vec<_> = products
            .iter()
            .enumerate()
            .map(|(i, p)| LineRequest {
                product_id: *p,
                quantity: (i + 1) as u32,
            })
            .collect();
        let catalog: Vec<_> = products.iter().map(|p| (*p, 500)).collect();

        let order = built_order(&requests, &catalog);

        let line_products: Vec<_> = order.lines().iter().map(|l| l.product_id()).collect();
        assert_eq!(line_products, products);
    }

    #[test]
    fn all_missing_products_are_enumerated_in_one_failure() {
        let known = test_product_id();
        let missing_a = test_product_id();
        let missing_b = test_product_id();
        let requests = [
            LineRequest {
                product_id: missing_a,
                quantity: 1,
            },
            LineRequest {
                product_id: known,
                quantity: 1,
            },
            LineRequest {
                product_id: missing_b,
                quantity: 1,
            },
        ];

        let err = Order::build(
            test_user_id(),
            &requests,
            &snapshots_for(&[(known, 100)]),
            test_time(),
        )
        .unwrap_err();

        assert_eq!(err, OrderError::ProductNotFound(vec![missing_a, missing_b]));
    }

    #[test]
    fn empty_request_list_is_rejected() {
        let err =
            Order::build(test_user_id(), &[], &HashMap::new(), test_time()).unwrap_err();
        assert_eq!(err, OrderError::EmptyOrder);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let p1 = test_product_id();
        let err = Order::build(
            test_user_id(),
            &[LineRequest {
                product_id: p1,
                quantity: 0,
            }],
            &snapshots_for(&[(p1, 100)]),
            test_time(),
        )
        .unwrap_err();

        assert_eq!(err, OrderError::InvalidQuantity { product_id: p1 });
    }

    #[test]
    fn forward_lifecycle_new_paid_shipped_delivered() {
        let p1 = test_product_id();
        let mut order = built_order(
            &[LineRequest {
                product_id: p1,
                quantity: 1,
            }],
            &[(p1, 100)],
        );

        for next in [
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            order.transition(next, test_time()).unwrap();
            assert_eq!(order.status(), next);
        }
    }

    #[test]
    fn illegal_transition_names_current_and_requested_status() {
        let p1 = test_product_id();
        let mut order = built_order(
            &[LineRequest {
                product_id: p1,
                quantity: 1,
            }],
            &[(p1, 100)],
        );

        let err = order
            .transition(OrderStatus::Delivered, test_time())
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::IllegalTransition {
                from: OrderStatus::New,
                to: OrderStatus::Delivered,
            }
        );
        assert_eq!(order.status(), OrderStatus::New);
    }

    #[test]
    fn canceling_twice_is_rejected_the_second_time() {
        let p1 = test_product_id();
        let mut order = built_order(
            &[LineRequest {
                product_id: p1,
                quantity: 1,
            }],
            &[(p1, 100)],
        );

        order.transition(OrderStatus::Canceled, test_time()).unwrap();
        let err = order
            .transition(OrderStatus::Canceled, test_time())
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::IllegalTransition {
                from: OrderStatus::Canceled,
                to: OrderStatus::Canceled,
            }
        );
    }

    #[test]
    fn transition_bumps_updated_at_and_keeps_created_at() {
        let p1 = test_product_id();
        let mut order = built_order(
            &[LineRequest {
                product_id: p1,
                quantity: 1,
            }],
            &[(p1, 100)],
        );
        let created = order.created_at();
        let later = created + chrono::Duration::seconds(5);

        order.transition(OrderStatus::Paid, later).unwrap();

        assert_eq!(order.created_at(), created);
        assert_eq!(order.updated_at(), later);
    }

    proptest! {
        /// Property: for any successfully built order, the total equals the
        /// sum of line subtotals and the line list is non-empty.
        #[test]
        fn total_is_sum_of_line_subtotals(
            lines in prop::collection::vec((1u32..50, 1u64..10_000), 1..8)
        ) {
            let products: Vec<(ProductId, u64)> = lines
                .iter()
                .map(|(_, price)| (test_product_id(), *price))
                .collect();
            let requests: Vec<LineRequest> = products
                .iter()
                .zip(&lines)
                .map(|((id, _), (quantity, _))| LineRequest {
                    product_id: *id,
                    quantity: *quantity,
                })
                .collect();

            let order = built_order(&requests, &products);

            prop_assert!(!order.lines().is_empty());
            let expected: Money = order.lines().iter().map(OrderLineItem::subtotal).sum();
            prop_assert_eq!(order.total(), expected);
        }
    }
}
