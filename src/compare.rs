//! Store Comparison
//!
//! What a product costs at every retailer, cheapest first.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    pricing::{PricingError, Quality, line_total, to_money},
    products::Product,
    retailers::Retailer,
};

/// Errors raised comparing store prices.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Catalog lookup error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Amount could not be represented as money
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Quantity is outside the product's purchasable range
    #[error("Quantity {quantity} of {product} is outside {min}..={max}")]
    QuantityOutOfRange {
        /// Product identifier
        product: String,
        /// Requested quantity
        quantity: Decimal,
        /// Minimum quantity
        min: Decimal,
        /// Maximum quantity
        max: Decimal,
    },

    /// Error writing the comparison table
    #[error("IO error writing comparison")]
    Io(#[from] io::Error),
}

/// Price of a product at one retailer.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePrice {
    /// Retailer
    pub retailer: Retailer,

    /// Price per unit of measure
    pub unit_price: Money<'static, Currency>,

    /// Line total for the compared quantity
    pub total: Money<'static, Currency>,

    /// Whether no retailer is cheaper
    pub is_best: bool,
}

/// Prices of one product and quantity across every retailer.
#[derive(Debug, Clone)]
pub struct StoreComparison<'c> {
    product: &'c Product,
    quantity: Decimal,
    rows: SmallVec<[StorePrice; 5]>,
    spread: Money<'static, Currency>,
}

impl<'c> StoreComparison<'c> {
    /// Compared product.
    pub fn product(&self) -> &'c Product {
        self.product
    }

    /// Compared quantity.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// One row per retailer, cheapest first.
    pub fn rows(&self) -> &[StorePrice] {
        &self.rows
    }

    /// Cheapest retailer; ties go to the first retailer listed.
    pub fn best(&self) -> Option<&StorePrice> {
        self.rows.first()
    }

    /// Difference between the most and least expensive line totals.
    pub fn spread(&self) -> &Money<'static, Currency> {
        &self.spread
    }

    /// Render the comparison as a table.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), CompareError> {
        let mut builder = Builder::default();

        builder.push_record(["Store", "Unit Price", "Total", "", "Link"]);

        for row in &self.rows {
            builder.push_record([
                row.retailer.display_name().to_string(),
                format!("{}/{}", row.unit_price, self.product.unit),
                row.total.to_string(),
                if row.is_best {
                    "best".to_string()
                } else {
                    String::new()
                },
                row.retailer.url().to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..3), Alignment::right());

        writeln!(
            out,
            "\n{} {} ({} {})\n{table}",
            self.product.glyph, self.product.name, self.quantity, self.product.unit
        )?;
        writeln!(out, " Spread: {}\n", self.spread)?;

        Ok(())
    }
}

/// Compare the price of `quantity` units of `product` at every retailer.
///
/// Rows are sorted by line total; retailers with equal totals keep their usual order.
///
/// # Errors
///
/// Returns [`CompareError::Pricing`] if an amount cannot be represented as money.
pub fn compare_store_prices<'c>(
    product: &'c Product,
    quantity: Decimal,
    currency: &'static Currency,
) -> Result<StoreComparison<'c>, CompareError> {
    let mut totals: SmallVec<[(Retailer, Decimal, Decimal); 5]> = product
        .retailer_prices
        .iter()
        .map(|(retailer, price)| {
            (
                retailer,
                price,
                line_total(product, quantity, retailer, Quality::Budget),
            )
        })
        .collect();

    totals.sort_by_key(|&(_, _, total)| total);

    let lowest = totals.first().map_or(Decimal::ZERO, |&(_, _, total)| total);
    let highest = totals.last().map_or(Decimal::ZERO, |&(_, _, total)| total);

    let rows = totals
        .into_iter()
        .map(|(retailer, unit, total)| {
            Ok(StorePrice {
                retailer,
                unit_price: to_money(unit, currency)?,
                total: to_money(total, currency)?,
                is_best: total == lowest,
            })
        })
        .collect::<Result<SmallVec<[StorePrice; 5]>, PricingError>>()?;

    Ok(StoreComparison {
        product,
        quantity,
        rows,
        spread: to_money(highest - lowest, currency)?,
    })
}

impl Catalog {
    /// Compare the price of `quantity` units of product `id` at every retailer.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or `quantity` is outside
    /// its purchasable range.
    pub fn compare(
        &self,
        id: &str,
        quantity: Decimal,
    ) -> Result<StoreComparison<'_>, CompareError> {
        let product = self.product(id)?;

        if quantity < product.quantity.min || quantity > product.quantity.max {
            return Err(CompareError::QuantityOutOfRange {
                product: product.id.clone(),
                quantity,
                min: product.quantity.min,
                max: product.quantity.max,
            });
        }

        compare_store_prices(product, quantity, self.currency())
    }
}
