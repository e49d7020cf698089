//! Retailers

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

/// Error parsing a retailer key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown retailer: {0}")]
pub struct UnknownRetailer(pub String);

/// A store the catalog carries prices for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Retailer {
    /// `DMart`
    DMart,

    /// Reliance Fresh
    Reliance,

    /// Blinkit
    Blinkit,

    /// Amazon Fresh
    Amazon,

    /// Swiggy Instamart
    Instamart,
}

impl Retailer {
    /// Every retailer, in catalog order.
    pub const ALL: [Retailer; 5] = [
        Retailer::DMart,
        Retailer::Reliance,
        Retailer::Blinkit,
        Retailer::Amazon,
        Retailer::Instamart,
    ];

    /// Key used in fixtures and on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Retailer::DMart => "dmart",
            Retailer::Reliance => "reliance",
            Retailer::Blinkit => "blinkit",
            Retailer::Amazon => "amazon",
            Retailer::Instamart => "instamart",
        }
    }

    /// Human readable store name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Retailer::DMart => "DMart",
            Retailer::Reliance => "Reliance Fresh",
            Retailer::Blinkit => "Blinkit",
            Retailer::Amazon => "Amazon Fresh",
            Retailer::Instamart => "Instamart",
        }
    }

    /// Storefront URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Retailer::DMart => "https://www.dmart.in",
            Retailer::Reliance => "https://www.relianceretail.com",
            Retailer::Blinkit => "https://blinkit.com",
            Retailer::Amazon => "https://www.amazon.in/fresh",
            Retailer::Instamart => "https://www.swiggy.com/instamart",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Retailer {
    type Err = UnknownRetailer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();

        Retailer::ALL
            .into_iter()
            .find(|retailer| retailer.key() == key)
            .ok_or_else(|| UnknownRetailer(s.to_string()))
    }
}

/// Per-unit price of a product at every retailer.
///
/// Every retailer has a price by construction; the catalog loader refuses
/// fixtures that leave one out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetailerPrices {
    dmart: Decimal,
    reliance: Decimal,
    blinkit: Decimal,
    amazon: Decimal,
    instamart: Decimal,
}

impl RetailerPrices {
    /// Create a price table.
    #[must_use]
    pub const fn new(
        dmart: Decimal,
        reliance: Decimal,
        blinkit: Decimal,
        amazon: Decimal,
        instamart: Decimal,
    ) -> Self {
        Self {
            dmart,
            reliance,
            blinkit,
            amazon,
            instamart,
        }
    }

    /// Create a price table where every retailer charges the same.
    #[must_use]
    pub const fn uniform(price: Decimal) -> Self {
        Self::new(price, price, price, price, price)
    }

    /// Per-unit price at the given retailer.
    #[must_use]
    pub const fn get(&self, retailer: Retailer) -> Decimal {
        match retailer {
            Retailer::DMart => self.dmart,
            Retailer::Reliance => self.reliance,
            Retailer::Blinkit => self.blinkit,
            Retailer::Amazon => self.amazon,
            Retailer::Instamart => self.instamart,
        }
    }

    /// Iterate over `(retailer, price)` pairs in retailer order.
    pub fn iter(&self) -> impl Iterator<Item = (Retailer, Decimal)> + '_ {
        Retailer::ALL
            .into_iter()
            .map(|retailer| (retailer, self.get(retailer)))
    }
}
