use serde::{Deserialize, Serialize};

/// Order status lifecycle.
///
/// Serialized UPPERCASE; the names travel in the cross-service event
/// payload and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    /// Legal state graph:
    /// `NEW -> {PAID, CANCELED}`, `PAID -> {SHIPPED, CANCELED}`,
    /// `SHIPPED -> {DELIVERED}`; `DELIVERED` and `CANCELED` are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (New, Paid) | (New, Canceled) | (Paid, Shipped) | (Paid, Canceled) | (Shipped, Delivered)
        )
    }

    /// Cancellation is only legal before shipping.
    pub fn can_be_canceled(self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::Paid)
    }

    /// No further transition is legal from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_admits_exactly_the_legal_pairs() {
        use OrderStatus::*;
        let legal = [
            (New, Paid),
            (New, Canceled),
            (Paid, Shipped),
            (Paid, Canceled),
            (Shipped, Delivered),
        ];

        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "unexpected verdict for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_transitions() {
        for from in OrderStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn cancellation_is_legal_exactly_from_new_and_paid() {
        for status in OrderStatus::ALL {
            assert_eq!(
                status.can_be_canceled(),
                status.can_transition_to(OrderStatus::Canceled)
            );
        }
    }

    #[test]
    fn serializes_as_uppercase_names() {
        let json = serde_json::to_string(&OrderStatus::New).unwrap();
        assert_eq!(json, "\"NEW\"");

        let back: OrderStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(back, OrderStatus::Canceled);
    }
}
