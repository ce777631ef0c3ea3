//! Cart Items

use serde::{Deserialize, Serialize};

use crate::{
    pricing::line_total,
    products::{Product, ProductId},
};

/// A product in the cart together with the quantity wanted.
///
/// Serializes as the product's fields with an extra `quantity` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    product: Product,

    quantity: u32,
}

impl CartItem {
    /// Create an item, or `None` if `quantity` is not within `1..=product.stock`.
    pub fn new(product: Product, quantity: u32) -> Option<Self> {
        (1..=product.stock)
            .contains(&quantity)
            .then_some(Self { product, quantity })
    }

    /// Snapshot of the product taken when it was added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Product identifier.
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Units wanted.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stock ceiling for this item.
    pub fn stock(&self) -> u32 {
        self.product.stock
    }

    /// Unit price multiplied by quantity, in minor units.
    pub fn line_total(&self) -> u64 {
        line_total(self.product.price, self.quantity)
    }

    /// Whether the quantity satisfies `1 <= quantity <= stock`.
    pub fn is_valid(&self) -> bool {
        (1..=self.product.stock).contains(&self.quantity)
    }

    /// First unit of a product. Callers must have checked stock.
    pub(crate) fn first_unit(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Add one unit unless that would exceed `ceiling`. Returns whether it changed.
    pub(crate) fn increment_within(&mut self, ceiling: u32) -> bool {
        if self.quantity < ceiling {
            self.quantity += 1;
            true
        } else {
            false
        }
    }

    /// Refresh the product snapshot and add one unit within its current stock.
    ///
    /// Callers must have checked that `product` is in stock, so the quantity stays within
    /// `1..=product.stock`. Returns whether the quantity changed.
    pub(crate) fn add_unit_of(&mut self, product: Product) -> bool {
        let before = self.quantity;

        self.quantity = self.quantity.saturating_add(1).min(product.stock);
        self.product = product;

        self.quantity != before
    }

    /// Remove one unit, never going below one. Returns whether it changed.
    pub(crate) fn decrement(&mut self) -> bool {
        if self.quantity > 1 {
            self.quantity -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_rejects_quantities_outside_stock() {
        let product = Product::new("A", "Headphones", 1_000, 2);

        assert!(CartItem::new(product.clone(), 0).is_none());
        assert!(CartItem::new(product.clone(), 3).is_none());
        assert!(CartItem::new(product, 2).is_some());
    }

    #[test]
    fn line_total_multiplies_price() -> TestResult {
        let item = CartItem::new(Product::new("A", "Headphones", 1_000, 5), 3).ok_or("invalid")?;

        assert_eq!(item.line_total(), 3_000);

        Ok(())
    }

    #[test]
    fn increment_stops_at_ceiling() {
        let mut item = CartItem::first_unit(Product::new("A", "Headphones", 1_000, 2));

        assert!(item.increment_within(2));
        assert!(!item.increment_within(2));
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn add_unit_of_takes_the_latest_stock() {
        let mut item = CartItem::first_unit(Product::new("A", "Headphones", 1_000, 2));
        assert!(item.increment_within(2));

        assert!(item.add_unit_of(Product::new("A", "Headphones", 1_000, 10)));
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.stock(), 10);

        assert!(item.add_unit_of(Product::new("A", "Headphones", 1_000, 1)));
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.stock(), 1);

        assert!(!item.add_unit_of(Product::new("A", "Headphones", 1_000, 1)));
        assert!(item.is_valid());
    }

    #[test]
    fn decrement_stops_at_one() {
        let mut item = CartItem::first_unit(Product::new("A", "Headphones", 1_000, 2));

        assert!(!item.decrement());
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn serializes_flat_with_quantity() -> TestResult {
        let item = CartItem::new(Product::new("A", "Headphones", 1_000, 5), 2).ok_or("invalid")?;

        let json = serde_json::to_value(&item)?;

        assert_eq!(json.get("id"), Some(&serde_json::json!("A")));
        assert_eq!(json.get("price"), Some(&serde_json::json!(1_000)));
        assert_eq!(json.get("stock"), Some(&serde_json::json!(5)));
        assert_eq!(json.get("quantity"), Some(&serde_json::json!(2)));

        Ok(())
    }
}
