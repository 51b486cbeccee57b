//! Cart Snapshot Repository

use std::sync::Arc;

use crate::{
    domain::carts::{errors::CartsServiceError, models::CartItem},
    storage::Storage,
};

/// Storage key holding the serialized cart.
pub const CART_SNAPSHOT_KEY: &str = "@gomarketplace:products";

#[derive(Clone)]
pub(crate) struct CartSnapshotRepository {
    storage: Arc<dyn Storage>,
    key: String,
}

impl std::fmt::Debug for CartSnapshotRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSnapshotRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartSnapshotRepository {
    #[must_use]
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, CART_SNAPSHOT_KEY)
    }

    #[must_use]
    pub(crate) fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Load the stored snapshot. A missing or empty value is an empty cart.
    pub(crate) async fn load(&self) -> Result<Vec<CartItem>, CartsServiceError> {
        match self.storage.get_item(&self.key).await? {
            Some(raw) if !raw.is_empty() => decode(&raw),
            Some(_) | None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn save(&self, items: &[CartItem]) -> Result<(), CartsServiceError> {
        let raw = encode(items)?;

        self.storage.set_item(&self.key, &raw).await?;

        Ok(())
    }

    pub(crate) async fn clear(&self) -> Result<(), CartsServiceError> {
        self.storage.remove_item(&self.key).await?;

        Ok(())
    }
}

pub(crate) fn encode(items: &[CartItem]) -> Result<String, CartsServiceError> {
    serde_json::to_string(items).map_err(CartsServiceError::Snapshot)
}

pub(crate) fn decode(raw: &str) -> Result<Vec<CartItem>, CartsServiceError> {
    serde_json::from_str(raw).map_err(CartsServiceError::Snapshot)
}
