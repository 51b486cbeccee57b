//! Carts service errors.

use thiserror::Error;

use crate::{domain::carts::models::ProductId, storage::StorageError};

/// Failure reported by the carts service and provider.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The cart was requested from a provider that has not been mounted.
    #[error("useCart must be used within a CartProvider")]
    OutsideProvider,

    /// The stored snapshot could not be decoded.
    #[error("malformed cart snapshot")]
    Snapshot(#[source] serde_json::Error),

    /// A quantity change would leave the product's quantity out of range.
    #[error("quantity of {0} out of range")]
    QuantityOverflow(ProductId),

    /// The cart totals are too large to represent; names the offending line.
    #[error("cart totals overflow at {0}")]
    SummaryOverflow(ProductId),

    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[from] StorageError),
}
