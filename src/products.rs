//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::{retailers::RetailerPrices, tags::ProductTags};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Unit of measure a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Unit {
    /// Kilograms
    #[serde(rename = "kg")]
    Kilogram,

    /// Grams
    #[serde(rename = "g")]
    Gram,

    /// Litres
    #[serde(rename = "L")]
    Litre,

    /// Millilitres
    #[serde(rename = "ml")]
    Millilitre,

    /// Single pieces
    #[serde(rename = "pc")]
    Piece,

    /// Bunches of greens
    #[serde(rename = "bunch")]
    Bunch,

    /// Packets
    #[serde(rename = "pkt")]
    Packet,

    /// Dozens
    #[serde(rename = "dozen")]
    Dozen,
}

impl Unit {
    /// Short label, as printed next to a quantity.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Litre => "L",
            Unit::Millilitre => "ml",
            Unit::Piece => "pc",
            Unit::Bunch => "bunch",
            Unit::Packet => "pkt",
            Unit::Dozen => "dozen",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health warning attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthFlag {
    /// High in sugar
    HighSugar,

    /// High in sodium
    HighSodium,
}

impl fmt::Display for HealthFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthFlag::HighSugar => f.write_str("high sugar"),
            HealthFlag::HighSodium => f.write_str("high sodium"),
        }
    }
}

/// Purchasable quantity range of a product, in its unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRange {
    /// Smallest quantity that can be bought
    pub min: Decimal,

    /// Largest quantity that can be bought
    pub max: Decimal,

    /// Increment between purchasable quantities
    pub step: Decimal,
}

impl QuantityRange {
    /// The quantity one step above `quantity`, clamped at the maximum.
    #[must_use]
    pub fn step_up(&self, quantity: Decimal) -> Decimal {
        (quantity + self.step).min(self.max)
    }

    /// Whether `quantity` is the minimum plus a whole number of steps, or the
    /// clamped maximum.
    #[must_use]
    pub fn is_reachable(&self, quantity: Decimal) -> bool {
        if quantity < self.min || quantity > self.max {
            return false;
        }

        quantity == self.max || ((quantity - self.min) % self.step).is_zero()
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Catalog identifier (e.g. `rice-regular`)
    pub id: String,

    /// Product name
    pub name: String,

    /// Display glyph
    pub glyph: String,

    /// Primary category (e.g. `grains`)
    pub category: String,

    /// Optional subcategory (e.g. `nuts`)
    pub subcategory: Option<String>,

    /// Unit of measure
    pub unit: Unit,

    /// Reference price for one unit of measure
    pub price: Decimal,

    /// Purchasable quantities
    pub quantity: QuantityRange,

    /// Product tags
    pub tags: ProductTags,

    /// Health warnings
    pub health_flags: SmallVec<[HealthFlag; 2]>,

    /// Catalog identifiers of substitutes, in preference order
    pub alternatives: SmallVec<[String; 4]>,

    /// Per-unit price at every retailer
    pub retailer_prices: RetailerPrices,
}
