//! Marketplace Cart
//!
//! A shopping-cart store for a storefront app. The cart is an ordered list of
//! product lines, unique by product id, mirrored to durable key-value storage
//! after every change and shared with consumers through a [`CartProvider`].

pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod storage;

pub use context::{Cart, CartProvider};
