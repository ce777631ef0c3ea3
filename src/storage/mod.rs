//! Storage
//!
//! Durable string-keyed slots, in the manner of browser local storage. Each slot holds one
//! serialized value and is overwritten on every write.

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is empty or contains characters the backend cannot address.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the write, e.g. because it is full or read-only.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable key-value slot store.
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Read the value under `key`, or `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be deleted.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Keys are restricted to ASCII alphanumerics, `-` and `_` so every backend can address them.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_keys() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("theme-colors").is_ok());
        assert!(validate_key("orders_v1").is_ok());
    }

    #[test]
    fn rejects_empty_and_path_like_keys() {
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            validate_key("../cart"),
            Err(StorageError::InvalidKey(key)) if key == "../cart"
        ));
        assert!(matches!(validate_key("a b"), Err(StorageError::InvalidKey(_))));
    }
}
