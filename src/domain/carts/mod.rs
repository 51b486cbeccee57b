//! Carts

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use repository::CART_SNAPSHOT_KEY;
pub use service::*;
