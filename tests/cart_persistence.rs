//! Cart persistence across provider restarts.

use std::sync::Arc;

use rust_decimal::Decimal;
use testresult::TestResult;

use marketplace_cart::{
    CartProvider,
    domain::carts::{CART_SNAPSHOT_KEY, CartsServiceError, models::NewCartItem},
    storage::{FileStorage, Storage},
};

fn product(id: &str, price: Decimal) -> NewCartItem {
    NewCartItem {
        id: id.into(),
        title: "T".to_string(),
        image_url: "u".to_string(),
        price,
    }
}

async fn mounted(storage: &FileStorage) -> Result<CartProvider, CartsServiceError> {
    let provider = CartProvider::from_storage(Arc::new(storage.clone()));

    provider.mount().await?;

    Ok(provider)
}

#[tokio::test]
async fn cart_survives_restart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    {
        let mut cart = mounted(&storage).await?.use_cart().await?;

        cart.add_to_cart(product("a", Decimal::new(5, 0))).await?;
        cart.add_to_cart(product("b", Decimal::new(1050, 2))).await?;
        cart.increment(&"b".into()).await?;
    }

    let cart = mounted(&storage).await?.use_cart().await?;

    let ids = cart
        .products()
        .iter()
        .map(|item| (item.id.as_str(), item.quantity))
        .collect::<Vec<_>>();

    assert_eq!(ids, [("a", 1), ("b", 2)]);
    assert_eq!(cart.summary()?.subtotal, Decimal::new(26, 0));

    Ok(())
}

#[tokio::test]
async fn first_add_on_empty_storage_writes_snapshot() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    let mut cart = mounted(&storage).await?.use_cart().await?;

    assert!(cart.products().is_empty());

    cart.add_to_cart(product("a", Decimal::new(5, 0))).await?;

    assert_eq!(
        storage.get_item(CART_SNAPSHOT_KEY).await?.as_deref(),
        Some(r#"[{"id":"a","title":"T","image_url":"u","price":5.0,"quantity":1}]"#)
    );

    Ok(())
}

#[tokio::test]
async fn decrement_below_zero_is_persisted() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    {
        let mut cart = mounted(&storage).await?.use_cart().await?;

        cart.add_to_cart(product("a", Decimal::new(5, 0))).await?;
        cart.decrement(&"a".into()).await?;
        cart.decrement(&"a".into()).await?;
    }

    let cart = mounted(&storage).await?.use_cart().await?;

    assert_eq!(cart.summary()?.quantity, -1);

    Ok(())
}

#[tokio::test]
async fn malformed_snapshot_fails_mount() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    storage.set_item(CART_SNAPSHOT_KEY, "[{").await?;

    let provider = CartProvider::from_storage(Arc::new(storage));
    let result = provider.mount().await;

    assert!(
        matches!(result, Err(CartsServiceError::Snapshot(_))),
        "expected Snapshot error, got {result:?}"
    );
    assert!(
        matches!(
            provider.use_cart().await,
            Err(CartsServiceError::OutsideProvider)
        ),
        "unmounted provider should refuse access"
    );

    Ok(())
}

#[tokio::test]
async fn clear_removes_snapshot_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    let mut cart = mounted(&storage).await?.use_cart().await?;

    cart.add_to_cart(product("a", Decimal::new(5, 0))).await?;

    assert!(storage.path_for(CART_SNAPSHOT_KEY).exists());

    cart.clear().await?;

    assert!(!storage.path_for(CART_SNAPSHOT_KEY).exists());
    assert!(mounted(&storage).await?.use_cart().await?.products().is_empty());

    Ok(())
}

#[tokio::test]
async fn oversized_snapshot_total_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    storage
        .set_item(
            CART_SNAPSHOT_KEY,
            r#"[{"id":"a","title":"T","image_url":"u","price":50000000000000000000000000000.0,"quantity":2}]"#,
        )
        .await?;

    let cart = mounted(&storage).await?.use_cart().await?;

    assert_eq!(cart.products().len(), 1);

    let result = cart.summary();

    assert!(
        matches!(&result, Err(CartsServiceError::SummaryOverflow(id)) if id.as_str() == "a"),
        "expected SummaryOverflow, got {result:?}"
    );

    Ok(())
}
