//! Grocer
//!
//! Grocer is a budget-constrained grocery basket planner. Given a budget, a
//! shopping purpose, a store, a quality tier and a dietary preference, it
//! greedily fills a basket from a static catalog without ever spending more
//! than 98% of the budget.
//!
//! Prices are exact decimals and midpoints always round up, so a premium
//! price such as `170 × 1.15 = 195.5` becomes 196. Planners that compute the
//! markup in binary floating point see `195.4999…` and round it down to 195;
//! premium totals can differ from theirs by a unit per line.
//!
//! ```no_run
//! use grocer::prelude::*;
//! use rusty_money::{Money, iso::INR};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::embedded()?;
//! let policy = Policy::embedded(&catalog)?;
//!
//! let params = RecommendationParams::new(Money::from_minor(100_000, INR), "everyday")
//!     .with_retailer(Retailer::Reliance)
//!     .with_diet(DietaryPreference::Vegetarian);
//!
//! let recommendation = generate_recommendations(&catalog, &policy, &params)?;
//!
//! for item in recommendation.items() {
//!     println!("{} {} {}: {}", item.name, item.quantity, item.unit, item.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod allocation;
pub mod catalog;
pub mod compare;
pub mod diet;
pub mod policy;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod recommendation;
pub mod retailers;
pub mod shopping_list;
pub mod tags;
