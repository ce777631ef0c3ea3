//! In-memory storage

use rustc_hash::FxHashMap;

use crate::storage::{Storage, StorageError, validate_key};

/// `FxHashMap`-backed storage for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a single pre-populated slot.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = FxHashMap::default();
        slots.insert(key.into(), value.into());

        Self { slots }
    }

    /// Raw slot contents, bypassing key validation.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.slots.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.slots.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_key_returns_none() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set("cart", "[]")?;
        storage.set("cart", "[1]")?;

        assert_eq!(storage.get("cart")?.as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_clears_slot_and_tolerates_absence() -> TestResult {
        let mut storage = MemoryStorage::with_value("cart", "[]");

        storage.remove("cart")?;
        storage.remove("cart")?;

        assert!(storage.is_empty());

        Ok(())
    }
}
