//! Grocer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allocation::{
        AllocationError, Allocator, RecommendationParams, generate_recommendations,
        selection::{Selection, SelectionEntry},
    },
    catalog::{Catalog, CatalogError},
    compare::{CompareError, StoreComparison, StorePrice, compare_store_prices},
    diet::DietaryPreference,
    policy::{Policy, PurposePolicy},
    pricing::{PricingError, Quality, line_total, round_half_up, unit_price},
    products::{HealthFlag, Product, ProductKey, QuantityRange, Unit},
    recommendation::{ListItem, Reason, Recommendation},
    retailers::{Retailer, RetailerPrices},
    shopping_list::{ShoppingList, ShoppingListError},
    tags::ProductTags,
};
