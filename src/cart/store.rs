//! Cart Store

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{CartItem, CartPersistence, total_item_count, total_price},
    pricing::to_money,
    products::Product,
    storage::Storage,
};

/// The single owner of cart state.
///
/// Every mutation is total: unknown ids and stock ceilings are silent no-ops, and a failed
/// persistence write is logged rather than returned because the in-memory state is
/// authoritative for the session. Items stay in the order they were first added.
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    items: Vec<CartItem>,
    persistence: CartPersistence<S>,
    currency: &'static Currency,
}

impl<S: Storage> CartStore<S> {
    /// Open the cart, restoring whatever `storage` holds.
    pub fn open(storage: S, currency: &'static Currency) -> Self {
        let persistence = CartPersistence::new(storage);
        let items = persistence.load();

        debug!(items = items.len(), "cart opened");

        Self {
            items,
            persistence,
            currency,
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The item for `id`, if present.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id().as_str() == id)
    }

    /// Whether the cart holds `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Quantity held for `id`, zero if absent.
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.get(id).map_or(0, CartItem::quantity)
    }

    /// Whether [`increase_quantity`](Self::increase_quantity) would change `id`.
    pub fn can_increase(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|item| item.quantity() < item.stock())
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of all quantities.
    pub fn total_item_count(&self) -> u64 {
        total_item_count(&self.items)
    }

    /// Sum of unit price times quantity, in minor units.
    pub fn total_price(&self) -> u64 {
        total_price(&self.items)
    }

    /// [`total_price`](Self::total_price) as [`Money`] in the cart currency.
    pub fn total_price_money(&self) -> Money<'static, Currency> {
        to_money(self.total_price(), self.currency)
    }

    /// Add one unit of `product`.
    ///
    /// An existing item takes the new product snapshot, so its stock ceiling follows the
    /// latest stock level, and gains a unit within that stock. A product not yet in the cart
    /// is appended with quantity one. Out-of-stock products are ignored.
    pub fn add(&mut self, product: &Product) {
        let id = product.id.as_str();

        if !product.is_in_stock() {
            debug!(%id, "add ignored for out-of-stock product");
        } else if let Some(item) = self.items.iter_mut().find(|item| item.id().as_str() == id) {
            if !item.add_unit_of(product.clone()) {
                debug!(%id, quantity = item.quantity(), "add ignored at stock ceiling");
            }
        } else {
            self.items.push(CartItem::first_unit(product.clone()));
        }

        self.persist();
    }

    /// Remove the item for `id`, if present.
    pub fn remove(&mut self, id: &str) {
        let before = self.items.len();

        self.items.retain(|item| item.id().as_str() != id);

        if self.items.len() == before {
            debug!(%id, "remove ignored for absent item");
        }

        self.persist();
    }

    /// Add one unit to `id`, up to its stock.
    pub fn increase_quantity(&mut self, id: &str) {
        match self.item_mut(id) {
            Some(item) => {
                let ceiling = item.stock();

                if !item.increment_within(ceiling) {
                    debug!(%id, quantity = item.quantity(), "increase ignored at stock ceiling");
                }
            }
            None => debug!(%id, "increase ignored for absent item"),
        }

        self.persist();
    }

    /// Remove one unit from `id`. An item at quantity one is kept; use [`remove`](Self::remove).
    pub fn decrease_quantity(&mut self, id: &str) {
        match self.item_mut(id) {
            Some(item) => {
                if !item.decrement() {
                    debug!(%id, "decrease ignored at quantity one");
                }
            }
            None => debug!(%id, "decrease ignored for absent item"),
        }

        self.persist();
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Close the cart, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id().as_str() == id)
    }

    fn persist(&mut self) {
        if let Err(error) = self.persistence.save(&self.items) {
            warn!(%error, items = self.items.len(), "failed to persist cart");
        }
    }
}
