//! Cart
//!
//! The shopping cart: an ordered list of [`CartItem`]s owned by a [`CartStore`], persisted to a
//! [`Storage`](crate::storage::Storage) slot after every mutation.

pub mod item;
pub mod persistence;
pub mod store;

pub use item::CartItem;
pub use persistence::{CART_STORAGE_KEY, CartPersistence, CartPersistenceError};
pub use store::CartStore;

use crate::pricing::line_total;

/// Total number of units across all items.
pub fn total_item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Total price of all items in minor units, saturating on overflow.
pub fn total_price(items: &[CartItem]) -> u64 {
    items.iter().fold(0, |acc: u64, item| {
        acc.saturating_add(line_total(item.product().price, item.quantity()))
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    #[test]
    fn totals_over_items() -> TestResult {
        let items = [
            CartItem::new(Product::new("A", "Headphones", 1_000, 5), 2).ok_or("bad A")?,
            CartItem::new(Product::new("B", "Cable", 500, 5), 1).ok_or("bad B")?,
        ];

        assert_eq!(total_item_count(&items), 3);
        assert_eq!(total_price(&items), 2_500);

        Ok(())
    }

    #[test]
    fn totals_over_no_items() {
        assert_eq!(total_item_count(&[]), 0);
        assert_eq!(total_price(&[]), 0);
    }
}
