//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CART_STORAGE_KEY, CartItem, CartPersistence, CartPersistenceError, CartStore},
    catalog::{Catalog, CatalogError, ProductQuery},
    orders::{
        DELIVERY_FEE, NewOrder, Order, OrderBook, OrderError, OrderStatus, PaymentMethod,
        TimelineStep, checkout_total,
    },
    pricing::to_money,
    products::{Product, ProductId},
    profile::{Address, AddressBook, NewAddress, ProfileError, User},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    theme::{ThemeColors, ThemePatch, ThemeStore},
};
