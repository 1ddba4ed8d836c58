use thiserror::Error;

use shop_products::ProductId;

use crate::status::OrderStatus;

/// Order-level business rule failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// An order must carry at least one line item.
    #[error("order must contain at least one line item")]
    EmptyOrder,

    /// A requested line quantity was below 1.
    #[error("quantity must be at least 1 for product {product_id}")]
    InvalidQuantity { product_id: ProductId },

    /// One or more referenced products are absent from the catalog.
    /// Carries **every** missing id, not just the first.
    #[error("products not found: {}", join_ids(.0))]
    ProductNotFound(Vec<ProductId>),

    /// The requested status change is not in the legal transition table.
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
