//! Recommendation
//!
//! The output of an allocation run: one list item per selected product,
//! basket totals and cross-sell suggestions.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    allocation::{MAX_CROSS_SELL, RecommendationParams, selection::Selection},
    catalog::Catalog,
    policy::PurposePolicy,
    pricing::{PricingError, Quality, from_money, line_total, to_money},
    products::{HealthFlag, Product, ProductKey, Unit},
    tags::{DIET, PROTEIN, STAPLE},
};

/// Why a product made it into the basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// Protein source for a protein-focused purpose
    HighProtein,

    /// Household staple
    EssentialStaple,

    /// Premium grains
    PremiumQuality,

    /// Diet product for a calorie-conscious purpose
    LowCalorie,
}

impl Reason {
    /// Reason for including `product`, first matching rule wins.
    pub fn for_product(
        product: &Product,
        purpose: &PurposePolicy,
        quality: Quality,
    ) -> Option<Self> {
        if product.tags.contains(PROTEIN) && purpose.protein_focus {
            Some(Reason::HighProtein)
        } else if product.tags.contains(STAPLE) {
            Some(Reason::EssentialStaple)
        } else if quality == Quality::Premium && product.category == "grains" {
            Some(Reason::PremiumQuality)
        } else if product.tags.contains(DIET) && purpose.calorie_conscious {
            Some(Reason::LowCalorie)
        } else {
            None
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Reason::HighProtein => "High protein",
            Reason::EssentialStaple => "Essential staple",
            Reason::PremiumQuality => "Premium quality",
            Reason::LowCalorie => "Low calorie",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of a recommended shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Identifier, unique within one recommendation
    pub id: String,

    /// Key of the underlying product
    pub product: ProductKey,

    /// Catalog identifier of the underlying product
    pub product_id: String,

    /// Product name
    pub name: String,

    /// Display glyph
    pub glyph: String,

    /// Chosen quantity
    pub quantity: Decimal,

    /// Unit of measure
    pub unit: Unit,

    /// Line total for the chosen quantity
    pub price: Money<'static, Currency>,

    /// Product category
    pub category: String,

    /// Whether the item has been picked up
    pub checked: bool,

    /// Why the product was chosen, if notable
    pub reason: Option<Reason>,

    /// Health warnings carried over from the product
    pub health_flags: SmallVec<[HealthFlag; 2]>,
}

impl ListItem {
    /// Project a selected product into a list item.
    ///
    /// # Errors
    ///
    /// Returns an error if the line total cannot be represented as money.
    pub fn project(
        index: usize,
        key: ProductKey,
        product: &Product,
        quantity: Decimal,
        purpose: &PurposePolicy,
        params: &RecommendationParams,
    ) -> Result<Self, PricingError> {
        let total = line_total(product, quantity, params.retailer, params.quality);

        Ok(ListItem {
            id: format!("item-{index}-{}", product.id),
            product: key,
            product_id: product.id.clone(),
            name: product.name.clone(),
            glyph: product.glyph.clone(),
            quantity,
            unit: product.unit,
            price: to_money(total, params.budget.currency())?,
            category: product.category.clone(),
            checked: false,
            reason: Reason::for_product(product, purpose, params.quality),
            health_flags: product.health_flags.clone(),
        })
    }
}

/// Result of an allocation run.
#[derive(Debug, Clone)]
pub struct Recommendation<'c> {
    items: Vec<ListItem>,
    total_amount: Money<'static, Currency>,
    saved_amount: Money<'static, Currency>,
    cross_sell: SmallVec<[&'c Product; MAX_CROSS_SELL]>,
}

impl<'c> Recommendation<'c> {
    /// Build a recommendation from a finished selection.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total, the basket total or the saved amount
    /// cannot be represented as money.
    pub fn project(
        catalog: &'c Catalog,
        selection: &Selection,
        purpose: &PurposePolicy,
        params: &RecommendationParams,
        cross_sell: SmallVec<[&'c Product; MAX_CROSS_SELL]>,
    ) -> Result<Self, PricingError> {
        let currency = params.budget.currency();

        let items = selection
            .iter()
            .filter_map(|entry| {
                catalog
                    .get(entry.product)
                    .map(|product| (entry.product, product, entry.quantity))
            })
            .enumerate()
            .map(|(index, (key, product, quantity))| {
                ListItem::project(index, key, product, quantity, purpose, params)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total: Decimal = items.iter().map(|item| from_money(&item.price)).sum();
        let saved = from_money(&params.budget) - total;

        Ok(Recommendation {
            items,
            total_amount: to_money(total, currency)?,
            saved_amount: to_money(saved, currency)?,
            cross_sell,
        })
    }

    /// Items in selection order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Take ownership of the items.
    pub fn into_items(self) -> Vec<ListItem> {
        self.items
    }

    /// Sum of the item line totals.
    pub fn total_amount(&self) -> &Money<'static, Currency> {
        &self.total_amount
    }

    /// Budget left over.
    pub fn saved_amount(&self) -> &Money<'static, Currency> {
        &self.saved_amount
    }

    /// Alternatives worth suggesting, at most [`MAX_CROSS_SELL`].
    pub fn cross_sell(&self) -> &[&'c Product] {
        &self.cross_sell
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
