//! Cart Persistence

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::CartItem,
    products::ProductId,
    storage::{Storage, StorageError},
};

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum CartPersistenceError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The payload was not a valid list of cart items.
    #[error("cart payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted item's quantity is outside `1..=stock` (product id, quantity, stock).
    #[error("cart item {0} has quantity {1} outside 1..={2}")]
    InvalidQuantity(ProductId, u32, u32),

    /// The same product appears in more than one persisted item.
    #[error("cart item {0} appears more than once")]
    DuplicateItem(ProductId),
}

/// Reads and writes the cart under [`CART_STORAGE_KEY`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    storage: S,
}

impl<S: Storage> CartPersistence<S> {
    /// Wrap a storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the persisted cart.
    ///
    /// Missing, unreadable or invalid payloads all load as an empty cart.
    pub fn load(&self) -> Vec<CartItem> {
        match self.try_load() {
            Ok(items) => items,
            Err(error) => {
                warn!(%error, "discarding persisted cart");
                Vec::new()
            }
        }
    }

    /// Load the persisted cart, reporting why a payload was rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`CartPersistenceError`] if the slot cannot be read, does not parse or breaks
    /// the cart invariants.
    pub fn try_load(&self) -> Result<Vec<CartItem>, CartPersistenceError> {
        let Some(raw) = self.storage.get(CART_STORAGE_KEY)? else {
            debug!("no persisted cart");
            return Ok(Vec::new());
        };

        decode(&raw)
    }

    /// Overwrite the persisted cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartPersistenceError`] if serialization or the storage write fails.
    pub fn save(&mut self, items: &[CartItem]) -> Result<(), CartPersistenceError> {
        let payload = serde_json::to_string(items)?;

        self.storage.set(CART_STORAGE_KEY, &payload)?;

        Ok(())
    }

    /// Borrow the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Recover the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn decode(raw: &str) -> Result<Vec<CartItem>, CartPersistenceError> {
    let items: Vec<CartItem> = serde_json::from_str(raw)?;
    let mut seen = FxHashSet::default();

    for item in &items {
        if !item.is_valid() {
            return Err(CartPersistenceError::InvalidQuantity(
                item.id().clone(),
                item.quantity(),
                item.stock(),
            ));
        }

        if !seen.insert(item.id().as_str()) {
            return Err(CartPersistenceError::DuplicateItem(item.id().clone()));
        }
    }

    Ok(items)
}
