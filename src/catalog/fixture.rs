//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogError},
    products::Product,
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code every price must use
    pub currency: String,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Product price (e.g., "155.00 GBP")
    pub price: String,

    /// Price before discount (e.g., "180.00 GBP")
    #[serde(default)]
    pub original_price: Option<String>,

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
    #[serde(default)]
    pub discount: Option<u8>,

    /// Average rating
    #[serde(default)]
    pub rating: Option<f32>,

    /// Number of reviews
    #[serde(default)]
    pub review_count: Option<u32>,
}

impl CatalogFixture {
    /// Convert the fixture into a [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the currency or any price is invalid, or ids repeat.
    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        let currency = find_currency(&self.currency)?;

        let products = self
            .products
            .into_iter()
            .map(|fixture| fixture.into_product(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(currency, products)
    }
}

impl ProductFixture {
    /// Convert the fixture into a [`Product`] priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a price is malformed or in another currency.
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, CatalogError> {
        let price = parse_price_in(&self.price, currency)?;
        let original_price = self
            .original_price
            .as_deref()
            .map(|original| parse_price_in(original, currency))
            .transpose()?;

        Ok(Product {
            id: self.id.into(),
            name: self.name,
            price,
            original_price,
            image: self.image,
            category: self.category,
            description: self.description,
            stock: self.stock,
            discount: self.discount,
            rating: self.rating,
            review_count: self.review_count,
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(u64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = find_currency(currency_code)?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    let scale = 10_u64
        .checked_pow(currency.exponent)
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

fn parse_price_in(s: &str, expected: &'static Currency) -> Result<u64, CatalogError> {
    let (minor_units, currency) = parse_price(s)?;

    if currency == expected {
        Ok(minor_units)
    } else {
        Err(CatalogError::CurrencyMismatch(
            expected.iso_alpha_code.to_string(),
            currency.iso_alpha_code.to_string(),
        ))
    }
}

fn find_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    iso::find(code).ok_or_else(|| CatalogError::UnknownCurrency(code.to_string()))
}
