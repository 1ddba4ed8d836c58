//! Product catalog view consumed by the order workflow.

pub mod snapshot;

pub use snapshot::{ProductId, ProductSnapshot};
