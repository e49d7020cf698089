//! Catalog
//!
//! The static product table. Products are loaded once from a YAML fixture,
//! validated, and then shared read-only between any number of allocation runs.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::fixture::{CatalogFixture, parse_currency},
    products::{Product, ProductKey},
    retailers::Retailer,
};

pub mod fixture;

/// Catalog shipped with the crate.
const EMBEDDED_CATALOG: &str = include_str!("../../fixtures/catalog.yml");

/// Catalog integrity errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a fixture file
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

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// A price is zero or negative
    #[error("Product {0} has a non-positive price")]
    NonPositivePrice(String),

    /// Quantity value that is not a decimal number
    #[error("Product {product} has an invalid quantity: {value}")]
    InvalidQuantity {
        /// Product identifier
        product: String,
        /// Offending value
        value: String,
    },

    /// Quantity range with `min > max`, a non-positive minimum or a non-positive step
    #[error("Product {0} has an invalid quantity range")]
    InvalidQuantityRange(String),

    /// A retailer price is missing from a product
    #[error("Product {product} has no price at {retailer}")]
    MissingRetailerPrice {
        /// Product identifier
        product: String,
        /// Retailer without a price
        retailer: Retailer,
    },

    /// A product is priced at a retailer the catalog does not know
    #[error("Product {product} is priced at unknown retailer {retailer}")]
    UnknownRetailer {
        /// Product identifier
        product: String,
        /// Unknown retailer key
        retailer: String,
    },

    /// Two products share an identifier
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// An alternative refers to a product that does not exist
    #[error("Product {product} lists unknown alternative {alternative}")]
    UnknownAlternative {
        /// Product identifier
        product: String,
        /// Unknown alternative identifier
        alternative: String,
    },

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The policy does not define its default purpose
    #[error("Default purpose {0} is not defined")]
    MissingDefaultPurpose(String),

    /// A purpose policy refers to a product that does not exist
    #[error("{context} refers to unknown product {product}")]
    UnknownPolicyProduct {
        /// Where the reference was found (e.g. `biryani essentials`)
        context: String,
        /// Unknown product identifier
        product: String,
    },
}

/// Catalog
#[derive(Debug)]
pub struct Catalog {
    /// Product storage
    products: SlotMap<ProductKey, Product>,

    /// Catalog identifier -> product key
    keys: FxHashMap<String, ProductKey>,

    /// Product keys in fixture order
    order: Vec<ProductKey>,

    /// Currency every price is expressed in
    currency: &'static Currency,
}

impl Catalog {
    /// Load the catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture fails validation.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Load a catalog from YAML source.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a product is invalid,
    /// identifiers repeat, or an alternative refers to an unknown product.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let currency = parse_currency(&fixture.currency)?;

        let mut catalog = Catalog {
            products: SlotMap::with_capacity_and_key(fixture.products.len()),
            keys: FxHashMap::default(),
            order: Vec::with_capacity(fixture.products.len()),
            currency,
        };

        for product_fixture in fixture.products {
            let product = product_fixture.try_into_product(currency)?;

            if catalog.keys.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            let id = product.id.clone();
            let key = catalog.products.insert(product);

            catalog.keys.insert(id, key);
            catalog.order.push(key);
        }

        catalog.validate_alternatives()?;

        debug!(
            products = catalog.len(),
            currency = currency.iso_alpha_code,
            "catalog loaded"
        );

        Ok(catalog)
    }

    fn validate_alternatives(&self) -> Result<(), CatalogError> {
        for product in self.iter().map(|(_, product)| product) {
            for alternative in &product.alternatives {
                if *alternative == product.id || !self.keys.contains_key(alternative) {
                    return Err(CatalogError::UnknownAlternative {
                        product: product.id.clone(),
                        alternative: alternative.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Get a product key by its catalog identifier.
    pub fn key(&self, id: &str) -> Option<ProductKey> {
        self.keys.get(id).copied()
    }

    /// Get a product by its catalog identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has this identifier.
    pub fn product(&self, id: &str) -> Result<&Product, CatalogError> {
        self.key(id)
            .and_then(|key| self.products.get(key))
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.order
            .iter()
            .filter_map(|key| self.products.get(*key).map(|product| (*key, product)))
    }

    /// Product storage, keyed by [`ProductKey`].
    pub fn products(&self) -> &SlotMap<ProductKey, Product> {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
