//! Shared inventory ledger: atomic per-product stock reservation.

pub mod ledger;

pub use ledger::{InventoryLedger, LedgerError};
