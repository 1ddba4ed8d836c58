use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shop_core::{Money, UserId};
use shop_events::Event;

use crate::order::{Order, OrderId};
use crate::status::OrderStatus;

/// Event: OrderPlaced.
///
/// The creation payload is a cross-service contract (the notification
/// service consumes it); field names and value shapes must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

impl OrderPlaced {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id_typed(),
            user_id: order.user_id(),
            status: order.status(),
            total_amount: order.total(),
            created_at: order.created_at(),
        }
    }
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

impl OrderStatusChanged {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id_typed(),
            user_id: order.user_id(),
            status: order.status(),
            total_amount: order.total(),
            created_at: order.created_at(),
            occurred_at: order.updated_at(),
        }
    }
}

/// Lifecycle events emitted after an order is persisted.
///
/// Untagged so the on-wire object is exactly the payload struct; the event
/// type travels out-of-band via [`Event::event_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderLifecycleEvent {
    Placed(OrderPlaced),
    StatusChanged(OrderStatusChanged),
}

impl Event for OrderLifecycleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderLifecycleEvent::Placed(_) => "orders.order.created",
            OrderLifecycleEvent::StatusChanged(_) => "orders.order.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderLifecycleEvent::Placed(e) => e.created_at,
            OrderLifecycleEvent::StatusChanged(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use shop_core::AggregateId;
    use shop_products::{ProductId, ProductSnapshot};

    use crate::order::LineRequest;

    fn placed_event() -> (Order, OrderLifecycleEvent) {
        let product_id = ProductId::new(AggregateId::new());
        let snapshots: HashMap<_, _> = [(
            product_id,
            ProductSnapshot {
                id: product_id,
                name: "widget".to_string(),
                unit_price: Money::from_minor_units(1000),
                available: 10,
            },
        )]
        .into();
        let order = Order::build(
            UserId::new(),
            &[LineRequest {
                product_id,
                quantity: 2,
            }],
            &snapshots,
            Utc::now(),
        )
        .unwrap();
        let event = OrderLifecycleEvent::Placed(OrderPlaced::from_order(&order));
        (order, event)
    }

    #[test]
    fn creation_payload_matches_the_cross_service_contract() {
        let (order, event) = placed_event();

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["createdAt", "orderId", "status", "totalAmount", "userId"]
        );
        assert_eq!(json["orderId"], order.id_typed().to_string());
        assert_eq!(json["userId"], order.user_id().to_string());
        assert_eq!(json["status"], "NEW");
        assert_eq!(json["totalAmount"], "20.00");
        // ISO-8601 timestamp, parseable back to the same instant.
        let created_at: DateTime<Utc> =
            json["createdAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(created_at, order.created_at());
    }

    #[test]
    fn event_types_distinguish_creation_from_status_change() {
        let (mut order, created) = placed_event();
        assert_eq!(created.event_type(), "orders.order.created");

        order.transition(OrderStatus::Paid, Utc::now()).unwrap();
        let changed = OrderLifecycleEvent::StatusChanged(OrderStatusChanged::from_order(&order));
        assert_eq!(changed.event_type(), "orders.order.status_changed");
        assert_eq!(changed.occurred_at(), order.updated_at());
    }
}
