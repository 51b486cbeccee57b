//! Cart Context
//!
//! [`CartProvider`] owns the cart service and must be mounted before any
//! consumer can obtain a [`Cart`] through [`CartProvider::use_cart`].

use std::sync::Arc;

use tokio::sync::{OnceCell, watch};

use crate::{
    domain::carts::{
        CartsService, CartsServiceError, StoredCartsService,
        models::{CartItem, CartSummary, NewCartItem, ProductId},
    },
    storage::Storage,
};

/// Provides a single shared cart to every consumer constructed with it.
#[derive(Clone)]
pub struct CartProvider {
    carts: Arc<dyn CartsService>,
    mounted: Arc<OnceCell<()>>,
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider")
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl CartProvider {
    /// Provider over an existing carts service. Nothing is loaded until
    /// [`CartProvider::mount`].
    #[must_use]
    pub fn new(carts: Arc<dyn CartsService>) -> Self {
        Self {
            carts,
            mounted: Arc::new(OnceCell::new()),
        }
    }

    /// Build a provider over a [`StoredCartsService`] backed by `storage`.
    #[must_use]
    pub fn from_storage(storage: Arc<dyn Storage>) -> Self {
        Self::new(Arc::new(StoredCartsService::new(storage)))
    }

    /// Load the stored cart. Only the first successful call reads storage.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be read or parsed; the
    /// provider stays unmounted and a later call retries the load.
    pub async fn mount(&self) -> Result<(), CartsServiceError> {
        self.mounted
            .get_or_try_init(|| async { self.carts.load().await.map(|_| ()) })
            .await?;

        Ok(())
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.initialized()
    }

    /// Current cart bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::OutsideProvider`] when the provider has
    /// not been mounted.
    pub async fn use_cart(&self) -> Result<Cart, CartsServiceError> {
        if !self.is_mounted() {
            return Err(CartsServiceError::OutsideProvider);
        }

        Ok(Cart {
            products: self.carts.products().await,
            carts: Arc::clone(&self.carts),
        })
    }

    /// Observe every committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.carts.subscribe()
    }
}

/// A view of the cart plus the operations that change it.
///
/// `products` is the state at the time the bundle was taken; each operation
/// refreshes it with the committed result.
#[derive(Clone)]
pub struct Cart {
    products: Vec<CartItem>,
    carts: Arc<dyn CartsService>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("products", &self.products)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Lines as of the last operation on this bundle.
    #[must_use]
    pub fn products(&self) -> &[CartItem] {
        &self.products
    }

    /// Totals of [`Cart::products`].
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::SummaryOverflow`] when the totals do not
    /// fit their types.
    pub fn summary(&self) -> Result<CartSummary, CartsServiceError> {
        CartSummary::of(&self.products)
    }

    /// # Errors
    ///
    /// Returns an error when the cart cannot be persisted.
    pub async fn add_to_cart(&mut self, item: NewCartItem) -> Result<(), CartsServiceError> {
        self.products = self.carts.add_to_cart(item).await?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the cart cannot be persisted or the quantity
    /// would overflow.
    pub async fn increment(&mut self, id: &ProductId) -> Result<(), CartsServiceError> {
        self.products = self.carts.increment(id).await?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the cart cannot be persisted or the quantity
    /// would underflow.
    pub async fn decrement(&mut self, id: &ProductId) -> Result<(), CartsServiceError> {
        self.products = self.carts.decrement(id).await?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be removed.
    pub async fn clear(&mut self) -> Result<(), CartsServiceError> {
        self.carts.clear().await?;
        self.products.clear();

        Ok(())
    }
}
