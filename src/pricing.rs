//! Pricing
//!
//! Unit and line prices for a product at a retailer and quality tier. All
//! arithmetic is exact decimal arithmetic; rounding happens in exactly two
//! places, both through [`round_half_up`]:
//!
//! 1. the premium markup is rounded to a whole currency unit per unit of measure;
//! 2. the line total (`unit price × quantity`) is rounded to a whole currency unit.
//!
//! For premium products both roundings apply in series. The markup is computed
//! exactly, so `170 × 1.15` is the midpoint `195.5` and rounds to 196.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{products::Product, retailers::Retailer};

/// Multiplier applied to retailer prices for premium quality.
pub const PREMIUM_MARKUP: Decimal = Decimal::from_parts(115, 0, 0, false, 2);

/// Minor units per major unit for the supported currencies.
const MINOR_UNITS: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Errors raised converting between decimal amounts and money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The amount does not fit into the money representation.
    #[error("Amount {0} cannot be represented in minor units")]
    Unrepresentable(Decimal),

    /// Unknown quality tier.
    #[error("Unknown quality tier: {0}")]
    UnknownQuality(String),
}

/// Quality tier of the products in a basket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Regular products at retailer prices
    #[default]
    Budget,

    /// Organic / better variants, priced with [`PREMIUM_MARKUP`]
    Premium,
}

impl Quality {
    /// Key used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Quality::Budget => "budget",
            Quality::Premium => "premium",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Quality {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "budget" => Ok(Quality::Budget),
            "premium" => Ok(Quality::Premium),
            _ => Err(PricingError::UnknownQuality(s.to_string())),
        }
    }
}

/// Round to a whole currency unit, with midpoints rounded up.
///
/// Midpoints are rounded away from zero; every amount the engine rounds is
/// non-negative, where this is the same as rounding half up.
#[must_use]
pub fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Price of one unit of measure of `product` at `retailer` in the given quality tier.
#[must_use]
pub fn unit_price(product: &Product, retailer: Retailer, quality: Quality) -> Decimal {
    let base = product.retailer_prices.get(retailer);

    match quality {
        Quality::Budget => base,
        Quality::Premium => round_half_up(base * PREMIUM_MARKUP),
    }
}

/// Total price of `quantity` units of `product`, rounded to a whole currency unit.
#[must_use]
pub fn line_total(
    product: &Product,
    quantity: Decimal,
    retailer: Retailer,
    quality: Quality,
) -> Decimal {
    round_half_up(unit_price(product, retailer, quality) * quantity)
}

/// Convert a major-unit amount into money.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] if the amount does not fit into `i64` minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = amount
        .checked_mul(MINOR_UNITS)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(PricingError::Unrepresentable(amount))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Convert money into a major-unit amount.
#[must_use]
pub fn from_money(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), 2)
}
