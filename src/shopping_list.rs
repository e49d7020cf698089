//! Shopping List
//!
//! A named checklist built from a recommendation.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    allocation::RecommendationParams,
    pricing::{Quality, round_half_up},
    recommendation::{ListItem, Recommendation},
    retailers::Retailer,
};

/// Errors related to shopping lists.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// No item has this identifier.
    #[error("Item {0} not found")]
    ItemNotFound(String),

    /// Error writing the list.
    #[error("IO error writing shopping list")]
    Io(#[from] io::Error),
}

/// Shopping List
#[derive(Debug, Clone)]
pub struct ShoppingList {
    name: String,
    budget: Money<'static, Currency>,
    purpose: String,
    retailer: Retailer,
    quality: Quality,
    items: Vec<ListItem>,
    total_amount: Money<'static, Currency>,
    saved_amount: Money<'static, Currency>,
}

impl ShoppingList {
    /// Create a list from a recommendation and the parameters that produced it.
    pub fn from_recommendation(
        name: impl Into<String>,
        params: &RecommendationParams,
        recommendation: Recommendation<'_>,
    ) -> Self {
        let total_amount = *recommendation.total_amount();
        let saved_amount = *recommendation.saved_amount();

        ShoppingList {
            name: name.into(),
            budget: params.budget,
            purpose: params.purpose.clone(),
            retailer: params.retailer,
            quality: params.quality,
            items: recommendation.into_items(),
            total_amount,
            saved_amount,
        }
    }

    /// List name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Budget the list was planned for.
    pub fn budget(&self) -> &Money<'static, Currency> {
        &self.budget
    }

    /// Purpose the list was planned for.
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Retailer whose prices were used.
    pub fn retailer(&self) -> Retailer {
        self.retailer
    }

    /// Quality tier.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Items in list order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Get an item by its identifier.
    pub fn item(&self, id: &str) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of the item line totals.
    pub fn total_amount(&self) -> &Money<'static, Currency> {
        &self.total_amount
    }

    /// Budget left over.
    pub fn saved_amount(&self) -> &Money<'static, Currency> {
        &self.saved_amount
    }

    /// Mark an item as picked up, or not.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::ItemNotFound`] if no item has this identifier.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<(), ShoppingListError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ShoppingListError::ItemNotFound(id.to_string()))?;

        item.checked = checked;

        Ok(())
    }

    /// Number of checked items.
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }

    /// Checked items as a whole percentage of all items; an empty list is 0%.
    pub fn progress(&self) -> Decimal {
        if self.items.is_empty() {
            return Decimal::ZERO;
        }

        round_half_up(
            Decimal::from(self.checked_count()) * Decimal::ONE_HUNDRED
                / Decimal::from(self.items.len()),
        )
    }

    /// Whether every item is checked. An empty list is never complete.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.checked)
    }

    /// Render the list as a table followed by its totals.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ShoppingListError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Quantity", "Price", "Note"]);

        for item in &self.items {
            builder.push_record([
                if item.checked { "[x]" } else { "[ ]" }.to_string(),
                format!("{} {}", item.glyph, item.name),
                format!("{} {}", item.quantity.normalize(), item.unit),
                item.price.to_string(),
                note(item),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(
            out,
            "\n {} ({}, {}, {})\n{table}",
            self.name,
            self.purpose,
            self.retailer.display_name(),
            self.quality
        )?;
        writeln!(out, " Budget:   {}", self.budget)?;
        writeln!(out, " Total:    {}", self.total_amount)?;
        writeln!(out, " Saved:    {}", self.saved_amount)?;
        writeln!(
            out,
            " Progress: {}/{} ({}%)\n",
            self.checked_count(),
            self.items.len(),
            self.progress()
        )?;

        Ok(())
    }
}

fn note(item: &ListItem) -> String {
    let flags = item
        .health_flags
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    match (item.reason, flags.is_empty()) {
        (Some(reason), true) => reason.to_string(),
        (Some(reason), false) => format!("{reason}; {flags}"),
        (None, false) => flags,
        (None, true) => String::new(),
    }
}
