//! Storefront
//!
//! Client-held storefront core: a read-only product catalog, a shopping cart persisted to a
//! durable key-value store, order history, the customer's address book and theme settings.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod profile;
pub mod storage;
pub mod theme;
