//! Catalog
//!
//! The read-only product list consumers browse and add to the cart from.

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::fixture::CatalogFixture,
    products::{Product, ProductId},
};

pub mod fixture;

const BUNDLED_CATALOG: &str = include_str!("../../fixtures/catalog.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product is priced in a different currency to the catalog (expected, found)
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an identifier
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),
}

/// Search and category filter over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    search: Option<String>,
    category: Option<String>,
}

impl ProductQuery {
    /// A query matching every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match products whose name or description contains `term`, ignoring case.
    #[must_use]
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();

        self.search = (!term.is_empty()).then(|| term.to_lowercase());
        self
    }

    /// Match products in exactly `category`.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Whether `product` satisfies every filter set on this query.
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            product.name.to_lowercase().contains(term)
                || product.description.to_lowercase().contains(term)
        });

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);

        matches_search && matches_category
    }
}

/// Products indexed by identifier, in fixture order.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn new(
        currency: &'static Currency,
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CatalogError> {
        let products: Vec<Product> = products.into_iter().collect();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            currency,
            products,
            index,
        })
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled fixture is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_fixture_str(BUNDLED_CATALOG)
    }

    /// Parse a catalog from fixture YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML, a price or a currency is invalid.
    pub fn from_fixture_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        fixture.into_catalog()
    }

    /// Load a catalog fixture from `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_fixture_str(&contents)
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// All products, in fixture order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| !category.is_empty() && seen.insert(*category))
            .collect()
    }

    /// Products matching `query`, in fixture order.
    pub fn filter(&self, query: &ProductQuery) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| query.matches(product))
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
