//! Product Tags
//!
//! Tags are free-form markers on catalog products (`vegan`, `staple`, `protein`, ...).
//! The engine only ever asks whether a tag is present, so the collection is kept
//! sorted and deduplicated for binary-search membership tests.

use std::{fmt, string::ToString};

use smallvec::SmallVec;

/// Marks a product as suitable for a vegan diet.
pub const VEGAN: &str = "vegan";

/// Marks a product as suitable for a vegetarian diet.
pub const VEGETARIAN: &str = "vegetarian";

/// Marks a household staple.
pub const STAPLE: &str = "staple";

/// Marks a protein source.
pub const PROTEIN: &str = "protein";

/// Marks a low calorie / diet friendly product.
pub const DIET: &str = "diet";

/// A sorted, deduplicated set of product tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTags {
    tags: SmallVec<[String; 6]>,
}

impl ProductTags {
    /// Create a tag set from owned strings.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 6]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create a tag set from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(
            tags.iter()
                .map(ToString::to_string)
                .collect::<SmallVec<[String; 6]>>(),
        )
    }

    /// Check if the set contains a tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    /// Add a tag, keeping the set sorted.
    pub fn add(&mut self, tag: &str) {
        if let Err(pos) = self.tags.binary_search_by(|t| t.as_str().cmp(tag)) {
            self.tags.insert(pos, tag.to_string());
        }
    }

    /// Iterate over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for ProductTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for tag in &self.tags {
            if !first {
                f.write_str(", ")?;
            }

            f.write_str(tag)?;
            first = false;
        }

        Ok(())
    }
}
