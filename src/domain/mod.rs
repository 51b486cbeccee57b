//! Marketplace Domain Concerns

pub mod carts;
