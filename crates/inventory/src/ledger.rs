use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use thiserror::Error;

use shop_products::ProductId;

/// Ledger-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Requested quantity exceeds current availability (unknown products
    /// report availability 0).
    #[error(
        "insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// Zero-quantity request; a caller contract violation, never a no-op.
    #[error("quantity must be a positive integer for product {product_id}")]
    InvalidQuantity { product_id: ProductId },
}

/// Shared stock ledger with per-product atomic check-and-reserve.
///
/// The map-level `RwLock` only guards the key set (registration and
/// lookup); every quantity sits behind its own `Mutex`, so the availability
/// read and the paired decrement are a single critical section per product.
/// Reservations for the same product serialize; reservations for different
/// products proceed in parallel.
#[derive(Debug, Default)]
pub struct InventoryLedger {
    entries: RwLock<HashMap<ProductId, Mutex<u32>>>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite a product's available quantity.
    ///
    /// Registration only; the order workflow never calls this.
    pub fn set_stock(&self, product_id: ProductId, quantity: u32) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let slot = entries.entry(product_id).or_insert_with(|| Mutex::new(0));
        *slot.get_mut().unwrap_or_else(PoisonError::into_inner) = quantity;
    }

    /// Current availability; 0 for products the ledger has never seen.
    pub fn available(&self, product_id: ProductId) -> u32 {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&product_id)
            .map(|slot| *slot.lock().unwrap_or_else(PoisonError::into_inner))
            .unwrap_or(0)
    }

    /// Atomically decrement availability by exactly `quantity`.
    ///
    /// Fails with [`LedgerError::InsufficientStock`] when the request
    /// exceeds what is available; availability is unchanged on failure.
    pub fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity { product_id });
        }

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = entries.get(&product_id) else {
            return Err(LedgerError::InsufficientStock {
                product_id,
                available: 0,
                requested: quantity,
            });
        };

        let mut available = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if *available < quantity {
            return Err(LedgerError::InsufficientStock {
                product_id,
                available: *available,
                requested: quantity,
            });
        }
        *available -= quantity;
        Ok(())
    }

    /// Increment availability by `quantity`.
    ///
    /// Used only to reverse a reservation on cancellation. Takes the same
    /// per-product critical section as `reserve`, so a release can never be
    /// lost against a concurrent reservation.
    pub fn release(&self, product_id: ProductId, quantity: u32) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity { product_id });
        }

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = entries.get(&product_id) {
                let mut available = slot.lock().unwrap_or_else(PoisonError::into_inner);
                *available = available.saturating_add(quantity);
                return Ok(());
            }
        }

        // Product never registered; releasing creates its entry.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let slot = entries.entry(product_id).or_insert_with(|| Mutex::new(0));
        let available = slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        *available = available.saturating_add(quantity);
        Ok(())
    }
}
