//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::{Mutex, watch};
use tracing::{Span, debug, info, warn};

use crate::{
    domain::carts::{
        errors::CartsServiceError,
        models::{CartItem, CartSummary, NewCartItem, ProductId},
        repository::CartSnapshotRepository,
    },
    storage::Storage,
};

/// Cart service persisting every committed change to a [`Storage`] snapshot.
///
/// Mutations are serialized: each one derives the next collection from the
/// current one, writes it, and only replaces the in-memory collection once the
/// write has succeeded. A failed write leaves the cart as it was.
#[derive(Debug)]
pub struct StoredCartsService {
    repository: CartSnapshotRepository,
    items: Mutex<Vec<CartItem>>,
    published: watch::Sender<Vec<CartItem>>,
}

impl StoredCartsService {
    /// Service keeping its snapshot under [`CART_SNAPSHOT_KEY`].
    ///
    /// [`CART_SNAPSHOT_KEY`]: crate::domain::carts::CART_SNAPSHOT_KEY
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::from_repository(CartSnapshotRepository::new(storage))
    }

    /// Use `key` instead of the default snapshot key.
    #[must_use]
    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self::from_repository(CartSnapshotRepository::with_key(storage, key))
    }

    fn from_repository(repository: CartSnapshotRepository) -> Self {
        let (published, _) = watch::channel(Vec::new());

        Self {
            repository,
            items: Mutex::new(Vec::new()),
            published,
        }
    }

    /// Apply `change` to the current items and persist the result.
    ///
    /// `change` returns `None` when nothing should be written. An error from
    /// `change` is returned as is, without writing.
    async fn update<F>(&self, change: F) -> Result<Vec<CartItem>, CartsServiceError>
    where
        F: FnOnce(&[CartItem]) -> Result<Option<Vec<CartItem>>, CartsServiceError> + Send,
    {
        let mut items = self.items.lock().await;

        let Some(next) = change(items.as_slice())? else {
            return Ok(items.clone());
        };

        if let Err(error) = self.repository.save(&next).await {
            warn!(%error, "cart snapshot write failed, keeping previous state");

            return Err(error);
        }

        *items = next.clone();

        self.published.send_replace(next.clone());

        Ok(next)
    }
}

#[async_trait]
impl CartsService for StoredCartsService {
    #[tracing::instrument(
        name = "carts.service.load",
        skip(self),
        fields(line_count = tracing::field::Empty),
        err
    )]
    async fn load(&self) -> Result<Vec<CartItem>, CartsServiceError> {
        let mut items = self.items.lock().await;

        let loaded = self.repository.load().await?;

        Span::current().record("line_count", loaded.len());

        *items = loaded.clone();

        self.published.send_replace(loaded.clone());

        info!("loaded cart snapshot");

        Ok(loaded)
    }

    async fn products(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    async fn summary(&self) -> Result<CartSummary, CartsServiceError> {
        CartSummary::of(&self.items.lock().await)
    }

    #[tracing::instrument(
        name = "carts.service.add_to_cart",
        skip(self, item),
        fields(product_id = %item.id),
        err
    )]
    async fn add_to_cart(&self, item: NewCartItem) -> Result<Vec<CartItem>, CartsServiceError> {
        self.update(|items| {
            if items.iter().any(|existing| existing.id == item.id) {
                debug!("product already in cart");

                return Ok(None);
            }

            let mut next = items.to_vec();

            next.push(item.into());

            Ok(Some(next))
        })
        .await
    }

    #[tracing::instrument(
        name = "carts.service.increment",
        skip(self, id),
        fields(product_id = %id),
        err
    )]
    async fn increment(&self, id: &ProductId) -> Result<Vec<CartItem>, CartsServiceError> {
        self.update(|items| adjust_quantity(items, id, 1).map(Some))
            .await
    }

    #[tracing::instrument(
        name = "carts.service.decrement",
        skip(self, id),
        fields(product_id = %id),
        err
    )]
    async fn decrement(&self, id: &ProductId) -> Result<Vec<CartItem>, CartsServiceError> {
        self.update(|items| adjust_quantity(items, id, -1).map(Some))
            .await
    }

    #[tracing::instrument(name = "carts.service.clear", skip(self), err)]
    async fn clear(&self) -> Result<(), CartsServiceError> {
        let mut items = self.items.lock().await;

        self.repository.clear().await?;

        items.clear();

        self.published.send_replace(Vec::new());

        info!("cleared cart");

        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.published.subscribe()
    }
}

/// Copy of `items` with `delta` applied to every line matching `id`.
///
/// Quantities are not floored; decrementing a single item yields zero and
/// then negative counts. A result outside the `i64` range is an error.
fn adjust_quantity(
    items: &[CartItem],
    id: &ProductId,
    delta: i64,
) -> Result<Vec<CartItem>, CartsServiceError> {
    items
        .iter()
        .cloned()
        .map(|mut item| {
            if item.id != *id {
                return Ok(item);
            }

            match item.quantity.checked_add(delta) {
                Some(quantity) => {
                    item.quantity = quantity;

                    Ok(item)
                }
                None => Err(CartsServiceError::QuantityOverflow(item.id)),
            }
        })
        .collect()
}

/// Cart operations shared by every consumer of a provider.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Replace the cart with the stored snapshot.
    async fn load(&self) -> Result<Vec<CartItem>, CartsServiceError>;

    /// Current cart lines in insertion order.
    async fn products(&self) -> Vec<CartItem>;

    /// Line count, total quantity and subtotal of the current cart.
    async fn summary(&self) -> Result<CartSummary, CartsServiceError>;

    /// Append `item` with a quantity of one. Adding a product already in the
    /// cart leaves it unchanged and writes nothing.
    async fn add_to_cart(&self, item: NewCartItem) -> Result<Vec<CartItem>, CartsServiceError>;

    /// Increase the quantity of the given product by one. Fails without
    /// writing if the quantity would overflow.
    async fn increment(&self, id: &ProductId) -> Result<Vec<CartItem>, CartsServiceError>;

    /// Decrease the quantity of the given product by one. Fails without
    /// writing if the quantity would underflow.
    async fn decrement(&self, id: &ProductId) -> Result<Vec<CartItem>, CartsServiceError>;

    /// Empty the cart and remove its snapshot.
    async fn clear(&self) -> Result<(), CartsServiceError>;

    /// Observe every committed cart.
    fn subscribe(&self) -> watch::Receiver<Vec<CartItem>>;
}
