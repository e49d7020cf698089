//! Dietary Preferences

use std::{convert::Infallible, fmt, str::FromStr};

use crate::{
    products::Product,
    tags::{VEGAN, VEGETARIAN},
};

/// Dietary preference used to narrow the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DietaryPreference {
    /// No restriction
    #[default]
    None,

    /// Vegetarian or vegan products only
    Vegetarian,

    /// Vegan products only
    Vegan,

    /// Explicitly unrestricted; behaves like [`DietaryPreference::None`]
    NonVeg,
}

impl DietaryPreference {
    /// Whether `product` may be offered under this preference.
    #[must_use]
    pub fn is_compatible(self, product: &Product) -> bool {
        match self {
            DietaryPreference::Vegan => product.tags.contains(VEGAN),
            DietaryPreference::Vegetarian => {
                product.tags.contains(VEGETARIAN) || product.tags.contains(VEGAN)
            }
            DietaryPreference::None | DietaryPreference::NonVeg => true,
        }
    }

    /// Narrow `products` to those compatible with this preference, keeping their order.
    pub fn filter<'p, I>(self, products: I) -> impl Iterator<Item = &'p Product>
    where
        I: IntoIterator<Item = &'p Product>,
    {
        products
            .into_iter()
            .filter(move |product| self.is_compatible(product))
    }

    /// Key used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            DietaryPreference::None => "none",
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::NonVeg => "non-veg",
        }
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsing never fails: anything unrecognised is treated as no restriction.
impl FromStr for DietaryPreference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "vegetarian" | "veg" => DietaryPreference::Vegetarian,
            "vegan" => DietaryPreference::Vegan,
            "non-veg" | "nonveg" | "non_veg" => DietaryPreference::NonVeg,
            _ => DietaryPreference::None,
        })
    }
}
