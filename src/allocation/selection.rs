//! Selection
//!
//! The products chosen by one allocation run, in the order they were admitted.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::products::ProductKey;

/// A product admitted into the basket and its chosen quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEntry {
    /// Selected product
    pub product: ProductKey,

    /// Chosen quantity, in the product's unit
    pub quantity: Decimal,
}

/// Insertion-ordered map of product key -> selection entry.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
    index: FxHashMap<ProductKey, usize>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a product at `quantity`.
    ///
    /// Returns `false` and leaves the selection untouched if the product is already selected.
    pub fn insert(&mut self, product: ProductKey, quantity: Decimal) -> bool {
        if self.index.contains_key(&product) {
            return false;
        }

        self.index.insert(product, self.entries.len());
        self.entries.push(SelectionEntry { product, quantity });

        true
    }

    /// Check if a product is selected.
    pub fn contains(&self, product: ProductKey) -> bool {
        self.index.contains_key(&product)
    }

    /// Get the entry for a product.
    pub fn get(&self, product: ProductKey) -> Option<&SelectionEntry> {
        self.index
            .get(&product)
            .and_then(|idx| self.entries.get(*idx))
    }

    /// Change the quantity of a selected product.
    ///
    /// Returns `false` if the product is not selected.
    pub(crate) fn set_quantity(&mut self, product: ProductKey, quantity: Decimal) -> bool {
        let Some(entry) = self
            .index
            .get(&product)
            .and_then(|idx| self.entries.get_mut(*idx))
        else {
            return false;
        };

        entry.quantity = quantity;

        true
    }

    /// Iterate over entries in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    /// Selected product keys in admission order.
    pub fn keys(&self) -> impl Iterator<Item = ProductKey> + '_ {
        self.entries.iter().map(|entry| entry.product)
    }

    /// Number of selected products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
