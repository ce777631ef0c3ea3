//! Profile
//!
//! The signed-in user and their address book.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::storage::{Storage, StorageError};

/// Storage slot holding the address book.
pub const ADDRESSES_STORAGE_KEY: &str = "addresses";

/// Profile errors
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No address has the given id.
    #[error("unknown address: {0}")]
    UnknownAddress(String),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The address book could not be serialized.
    #[error("address book is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: String,

    /// Login name
    pub username: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// When the account was created
    pub created_at: Timestamp,
}

impl User {
    /// First and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address id
    pub id: String,

    /// Short label, e.g. "Home"
    pub title: String,

    /// Province id
    pub province_id: String,

    /// Province display name
    pub province_name: String,

    /// City id
    pub city_id: String,

    /// City display name
    pub city_name: String,

    /// Postal code
    pub postal_code: String,

    /// Street address
    pub address: String,

    /// Name of the person receiving deliveries
    pub receiver_name: String,

    /// Phone number of the receiver
    pub receiver_phone: String,

    /// Whether this is the default delivery address
    pub is_default: bool,
}

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub title: String,
    pub province_id: String,
    pub province_name: String,
    pub city_id: String,
    pub city_name: String,
    pub postal_code: String,
    pub address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
}

/// Saved addresses, at most one of which is the default.
///
/// The first address saved becomes the default, and removing the default promotes the
/// first remaining address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Create an empty address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the address book from `storage`, starting empty if nothing valid is stored.
    pub fn load<S: Storage>(storage: &S) -> Self {
        let raw = match storage.get(ADDRESSES_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(error) => {
                warn!(%error, "failed to read address book");
                return Self::new();
            }
        };

        match serde_json::from_str::<Self>(&raw) {
            Ok(mut book) => {
                book.normalize_default();
                book
            }
            Err(error) => {
                warn!(%error, "discarding persisted address book");
                Self::new()
            }
        }
    }

    /// Persist the address book to `storage`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if serialization or the write fails.
    pub fn save<S: Storage>(&self, storage: &mut S) -> Result<(), ProfileError> {
        storage.set(ADDRESSES_STORAGE_KEY, &serde_json::to_string(self)?)?;

        Ok(())
    }

    /// All addresses in the order they were added.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Look up an address by id.
    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|address| address.id == id)
    }

    /// The default delivery address.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }

    /// Save a new address and return its id.
    pub fn add(&mut self, address: NewAddress) -> String {
        let id = self.next_id();

        self.addresses.push(Address {
            id: id.clone(),
            title: address.title,
            province_id: address.province_id,
            province_name: address.province_name,
            city_id: address.city_id,
            city_name: address.city_name,
            postal_code: address.postal_code,
            address: address.address,
            receiver_name: address.receiver_name,
            receiver_phone: address.receiver_phone,
            is_default: self.addresses.is_empty(),
        });

        id
    }

    /// Remove the address with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnknownAddress`] if no address has that id.
    pub fn remove(&mut self, id: &str) -> Result<Address, ProfileError> {
        let position = self
            .addresses
            .iter()
            .position(|address| address.id == id)
            .ok_or_else(|| ProfileError::UnknownAddress(id.to_string()))?;

        let removed = self.addresses.remove(position);

        self.normalize_default();

        Ok(removed)
    }

    /// Make the address with `id` the only default.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnknownAddress`] if no address has that id.
    pub fn set_default(&mut self, id: &str) -> Result<(), ProfileError> {
        if self.get(id).is_none() {
            return Err(ProfileError::UnknownAddress(id.to_string()));
        }

        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }

        Ok(())
    }

    /// Number of addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no address is saved.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    fn next_id(&self) -> String {
        let highest = self
            .addresses
            .iter()
            .filter_map(|address| address.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        highest.saturating_add(1).to_string()
    }

    fn normalize_default(&mut self) {
        let mut seen_default = false;

        for address in &mut self.addresses {
            if address.is_default {
                address.is_default = !seen_default;
                seen_default = true;
            }
        }

        if !seen_default {
            if let Some(first) = self.addresses.first_mut() {
                first.is_default = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    fn new_address(title: &str) -> NewAddress {
        NewAddress {
            title: title.to_string(),
            province_id: "1".to_string(),
            province_name: "Greater London".to_string(),
            city_id: "10".to_string(),
            city_name: "London".to_string(),
            postal_code: "SW1A 1AA".to_string(),
            address: "1 Example Street".to_string(),
            receiver_name: "Sam Taylor".to_string(),
            receiver_phone: "07700 900000".to_string(),
        }
    }

    #[test]
    fn first_address_becomes_default() {
        let mut book = AddressBook::new();

        let home = book.add(new_address("Home"));
        let work = book.add(new_address("Work"));

        assert_eq!(book.default_address().map(|a| a.id.as_str()), Some(home.as_str()));
        assert_eq!(book.get(&work).map(|a| a.is_default), Some(false));
    }

    #[test]
    fn set_default_moves_the_flag() -> TestResult {
        let mut book = AddressBook::new();
        book.add(new_address("Home"));
        let work = book.add(new_address("Work"));

        book.set_default(&work)?;

        let defaults: Vec<&str> = book
            .addresses()
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.title.as_str())
            .collect();

        assert_eq!(defaults, ["Work"]);

        Ok(())
    }

    #[test]
    fn set_default_unknown_id_errors() {
        let mut book = AddressBook::new();

        let result = book.set_default("42");

        assert!(matches!(result, Err(ProfileError::UnknownAddress(id)) if id == "42"));
    }

    #[test]
    fn removing_default_promotes_first_remaining() -> TestResult {
        let mut book = AddressBook::new();
        let home = book.add(new_address("Home"));
        book.add(new_address("Work"));
        book.add(new_address("Gym"));

        let removed = book.remove(&home)?;

        assert_eq!(removed.title, "Home");
        assert_eq!(book.default_address().map(|a| a.title.as_str()), Some("Work"));

        Ok(())
    }

    #[test]
    fn next_id_follows_highest_remaining() -> TestResult {
        let mut book = AddressBook::new();
        book.add(new_address("Home"));
        let work = book.add(new_address("Work"));

        book.remove(&work)?;
        let gym = book.add(new_address("Gym"));

        assert_eq!(gym, "2");

        let later = book.add(new_address("Office"));
        assert_eq!(later, "3");

        Ok(())
    }

    #[test]
    fn saves_and_loads_through_storage() -> TestResult {
        let mut storage = MemoryStorage::new();
        let mut book = AddressBook::new();
        book.add(new_address("Home"));
        book.add(new_address("Work"));

        book.save(&mut storage)?;

        assert_eq!(AddressBook::load(&storage), book);

        Ok(())
    }

    #[test]
    fn load_repairs_multiple_defaults() {
        let raw = r#"[
            {"id":"1","title":"Home","provinceId":"1","provinceName":"P","cityId":"1","cityName":"C","postalCode":"1","address":"A","receiverName":"R","receiverPhone":"0","isDefault":true},
            {"id":"2","title":"Work","provinceId":"1","provinceName":"P","cityId":"1","cityName":"C","postalCode":"1","address":"A","receiverName":"R","receiverPhone":"0","isDefault":true}
        ]"#;
        let storage = MemoryStorage::with_value(ADDRESSES_STORAGE_KEY, raw);

        let book = AddressBook::load(&storage);

        assert_eq!(book.addresses().iter().filter(|a| a.is_default).count(), 1);
        assert_eq!(book.default_address().map(|a| a.id.as_str()), Some("1"));
    }

    #[test]
    fn full_name_joins_names() -> TestResult {
        let user = User {
            id: "1".to_string(),
            username: "sam".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Taylor".to_string(),
            phone: "07700 900000".to_string(),
            email: None,
            avatar: None,
            created_at: "2024-01-01T00:00:00Z".parse()?,
        };

        assert_eq!(user.full_name(), "Sam Taylor");

        Ok(())
    }
}
