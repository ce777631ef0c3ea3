//! Products

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Stock level below which a product is shown as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product
///
/// A read-only catalog entry. Prices are held in minor units of the catalog currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    /// Price before discount, in minor units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Display category
    #[serde(default)]
    pub category: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Units available
    pub stock: u32,

    /// Advertised discount percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,

    /// Average rating out of five
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// Number of reviews behind the rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

impl Product {
    /// Create a product with the required fields; metadata is left empty.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            image: String::new(),
            category: String::new(),
            description: String::new(),
            stock,
            discount: None,
            rating: None,
            review_count: None,
        }
    }

    /// Set the display category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the pre-discount price.
    #[must_use]
    pub fn with_original_price(mut self, original_price: u64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Whether at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product is in stock but below [`LOW_STOCK_THRESHOLD`].
    pub fn is_low_stock(&self) -> bool {
        self.is_in_stock() && self.stock < LOW_STOCK_THRESHOLD
    }

    /// Amount saved against the original price, if one is set and higher.
    pub fn savings(&self) -> Option<u64> {
        self.original_price
            .and_then(|original| original.checked_sub(self.price))
            .filter(|saved| *saved > 0)
    }
}
