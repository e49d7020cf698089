//! Catalog Fixtures
//!
//! Serde shapes of the YAML catalog and their conversion into [`Product`]s.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    catalog::CatalogError,
    products::{HealthFlag, Product, QuantityRange, Unit},
    retailers::{Retailer, RetailerPrices},
    tags::ProductTags,
};

/// Wrapper for the catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Currency code every price is expected to use
    pub currency: String,

    /// Products, in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Display glyph
    #[serde(default)]
    pub glyph: String,

    /// Primary category
    pub category: String,

    /// Optional subcategory
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Unit of measure
    pub unit: Unit,

    /// Reference price per unit (e.g., "45 INR")
    pub price: String,

    /// Purchasable quantity range
    pub quantity: QuantityFixture,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Health warnings
    #[serde(default)]
    pub health_flags: Vec<HealthFlag>,

    /// Substitute product identifiers
    #[serde(default)]
    pub alternatives: Vec<String>,

    /// Retailer key -> price per unit (e.g., "45 INR")
    pub retailers: FxHashMap<String, String>,
}

/// Quantity range in YAML; values are strings so they parse as exact decimals.
#[derive(Debug, Deserialize)]
pub struct QuantityFixture {
    /// Minimum quantity
    pub min: String,

    /// Maximum quantity
    pub max: String,

    /// Quantity step
    pub step: String,
}

impl ProductFixture {
    /// Convert into a product, checking every price is in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or quantity cannot be parsed, a price is not
    /// positive, a retailer is missing or unknown, the quantity range is
    /// inconsistent, or a price uses a different currency.
    pub fn try_into_product(self, currency: &'static Currency) -> Result<Product, CatalogError> {
        let price = parse_price_in(&self.price, currency)?;

        if price <= Decimal::ZERO {
            return Err(CatalogError::NonPositivePrice(self.id));
        }

        let retailer_prices = self.retailer_prices(currency)?;
        let quantity = self.quantity_range()?;

        let tag_refs: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        let tags = ProductTags::from_strs(&tag_refs);

        Ok(Product {
            id: self.id,
            name: self.name,
            glyph: self.glyph,
            category: self.category,
            subcategory: self.subcategory,
            unit: self.unit,
            price,
            quantity,
            tags,
            health_flags: SmallVec::from_vec(self.health_flags),
            alternatives: SmallVec::from_vec(self.alternatives),
            retailer_prices,
        })
    }

    fn retailer_prices(&self, currency: &'static Currency) -> Result<RetailerPrices, CatalogError> {
        if let Some(unknown) = self
            .retailers
            .keys()
            .find(|key| key.parse::<Retailer>().is_err())
        {
            return Err(CatalogError::UnknownRetailer {
                product: self.id.clone(),
                retailer: unknown.clone(),
            });
        }

        let price_at = |retailer: Retailer| -> Result<Decimal, CatalogError> {
            let raw = self.retailers.get(retailer.key()).ok_or_else(|| {
                CatalogError::MissingRetailerPrice {
                    product: self.id.clone(),
                    retailer,
                }
            })?;

            let price = parse_price_in(raw, currency)?;

            if price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice(self.id.clone()));
            }

            Ok(price)
        };

        Ok(RetailerPrices::new(
            price_at(Retailer::DMart)?,
            price_at(Retailer::Reliance)?,
            price_at(Retailer::Blinkit)?,
            price_at(Retailer::Amazon)?,
            price_at(Retailer::Instamart)?,
        ))
    }

    fn quantity_range(&self) -> Result<QuantityRange, CatalogError> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<Decimal>()
                .map_err(|_err| CatalogError::InvalidQuantity {
                    product: self.id.clone(),
                    value: raw.to_string(),
                })
        };

        let range = QuantityRange {
            min: parse(&self.quantity.min)?,
            max: parse(&self.quantity.max)?,
            step: parse(&self.quantity.step)?,
        };

        if range.min <= Decimal::ZERO || range.step <= Decimal::ZERO || range.min > range.max {
            return Err(CatalogError::InvalidQuantityRange(self.id.clone()));
        }

        Ok(range)
    }
}

/// Parse price string (e.g., "0.42 INR") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((amount, parse_currency(currency_code)?))
}

/// Look up a supported currency by its ISO code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code.trim() {
        "INR" => Ok(INR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}

fn parse_price_in(s: &str, currency: &'static Currency) -> Result<Decimal, CatalogError> {
    let (amount, price_currency) = parse_price(s)?;

    if price_currency != currency {
        return Err(CatalogError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price_currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(amount)
}
