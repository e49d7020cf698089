//! Allocation
//!
//! Greedy, order-dependent basket allocation. A run admits essentials first,
//! then fills with the cheapest remaining candidates, then grows quantities
//! until the basket reaches its target share of the budget:
//!
//! 1. **Essentials**: the purpose's essentials (plus any subcategory essentials),
//!    each admitted at minimum quantity if it still fits under the ceiling.
//! 2. **Fill**: one pass over the candidate pool, cheapest minimum purchase first.
//! 3. **Expansion**: staples step up first, then every selected product in
//!    admission order, until the target is reached or nothing can grow.
//!
//! Nothing here ever fails for a small budget; an unaffordable budget simply
//! produces an empty recommendation.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    allocation::selection::Selection,
    catalog::Catalog,
    diet::DietaryPreference,
    policy::{Policy, PurposePolicy},
    pricing::{PricingError, Quality, from_money, line_total},
    products::{Product, ProductKey},
    recommendation::Recommendation,
    retailers::Retailer,
};

pub mod selection;

/// Share of the budget a basket may never exceed.
pub const BUDGET_CEILING: Decimal = Decimal::from_parts(98, 0, 0, false, 2);

/// Share of the budget quantity expansion aims for.
pub const TARGET_FLOOR: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// Maximum number of cross-sell suggestions.
pub const MAX_CROSS_SELL: usize = 5;

/// Errors raised by an allocation run.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The budget currency differs from the catalog currency (budget currency, catalog currency).
    #[error("Budget has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// An amount could not be represented as money.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Inputs of one allocation run.
#[derive(Debug, Clone)]
pub struct RecommendationParams {
    /// Total budget
    pub budget: Money<'static, Currency>,

    /// Purpose key, e.g. `everyday` or `biryani`
    pub purpose: String,

    /// Quality tier
    pub quality: Quality,

    /// Retailer whose prices are used
    pub retailer: Retailer,

    /// Dietary preference
    pub diet: DietaryPreference,

    /// Optional subcategory, e.g. `mutton` for a biryani
    pub subcategory: Option<String>,
}

impl RecommendationParams {
    /// Parameters for `purpose` at `budget`, budget quality at `DMart` with no dietary restriction.
    pub fn new(budget: Money<'static, Currency>, purpose: impl Into<String>) -> Self {
        RecommendationParams {
            budget,
            purpose: purpose.into(),
            quality: Quality::default(),
            retailer: Retailer::DMart,
            diet: DietaryPreference::default(),
            subcategory: None,
        }
    }

    /// Set the quality tier.
    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the retailer.
    #[must_use]
    pub fn with_retailer(mut self, retailer: Retailer) -> Self {
        self.retailer = retailer;
        self
    }

    /// Set the dietary preference.
    #[must_use]
    pub fn with_diet(mut self, diet: DietaryPreference) -> Self {
        self.diet = diet;
        self
    }

    /// Set the subcategory.
    #[must_use]
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

/// Candidate product and its line total at minimum quantity.
#[derive(Debug, Clone, Copy)]
struct Candidate<'c> {
    key: ProductKey,
    product: &'c Product,
    min_cost: Decimal,
}

/// Basket allocator over a shared, read-only catalog and policy.
#[derive(Debug, Clone, Copy)]
pub struct Allocator<'c> {
    catalog: &'c Catalog,
    policy: &'c Policy,
}

impl<'c> Allocator<'c> {
    /// Create an allocator.
    pub fn new(catalog: &'c Catalog, policy: &'c Policy) -> Self {
        Allocator { catalog, policy }
    }

    /// Allocate a basket for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::CurrencyMismatch`] if the budget is not in
    /// the catalog currency, or [`AllocationError::Pricing`] if a total cannot
    /// be represented as money.
    pub fn recommend(
        &self,
        params: &RecommendationParams,
    ) -> Result<Recommendation<'c>, AllocationError> {
        let currency = self.catalog.currency();
        let budget_currency = params.budget.currency();

        if budget_currency != currency {
            return Err(AllocationError::CurrencyMismatch(
                budget_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let budget = from_money(&params.budget);
        let purpose = self.policy.purpose(&params.purpose);

        if budget <= Decimal::ZERO {
            debug!(%budget, "budget is not positive, nothing is affordable");

            return Ok(Recommendation::project(
                self.catalog,
                &Selection::new(),
                purpose,
                params,
                SmallVec::new(),
            )?);
        }

        let mut run = Run {
            catalog: self.catalog,
            retailer: params.retailer,
            quality: params.quality,
            selection: Selection::new(),
            total: Decimal::ZERO,
            max_allowed: budget * BUDGET_CEILING,
            target_min: budget * TARGET_FLOOR,
        };

        let candidates = self.candidates(purpose, params);

        debug!(
            purpose = %params.purpose,
            retailer = %params.retailer,
            quality = %params.quality,
            diet = %params.diet,
            candidates = candidates.len(),
            max_allowed = %run.max_allowed,
            target_min = %run.target_min,
            "allocating basket"
        );

        let essentials = self
            .policy
            .essentials(&params.purpose, params.subcategory.as_deref());

        run.admit_essentials(&essentials, &candidates);
        run.fill(&candidates);
        run.expand(self.policy.staple_priority());

        let cross_sell = self.cross_sell(&run.selection, params.diet);

        debug!(
            items = run.selection.len(),
            total = %run.total,
            cross_sell = cross_sell.len(),
            "basket allocated"
        );

        Ok(Recommendation::project(
            self.catalog,
            &run.selection,
            purpose,
            params,
            cross_sell,
        )?)
    }

    /// Products allowed for the purpose and diet, cheapest minimum purchase first.
    ///
    /// Ties keep catalog order.
    fn candidates(
        &self,
        purpose: &PurposePolicy,
        params: &RecommendationParams,
    ) -> Vec<Candidate<'c>> {
        let mut candidates: Vec<Candidate<'c>> = self
            .catalog
            .iter()
            .filter(|(_, product)| purpose.allows_category(&product.category))
            .filter(|(_, product)| params.diet.is_compatible(product))
            .map(|(key, product)| Candidate {
                key,
                product,
                min_cost: line_total(
                    product,
                    product.quantity.min,
                    params.retailer,
                    params.quality,
                ),
            })
            .collect();

        candidates.sort_by_key(|candidate| candidate.min_cost);

        candidates
    }

    /// Alternatives of selected products worth suggesting, in first-seen order.
    fn cross_sell(
        &self,
        selection: &Selection,
        diet: DietaryPreference,
    ) -> SmallVec<[&'c Product; MAX_CROSS_SELL]> {
        let mut suggestions: SmallVec<[&'c Product; MAX_CROSS_SELL]> = SmallVec::new();
        let mut seen: SmallVec<[ProductKey; MAX_CROSS_SELL]> = SmallVec::new();

        let alternatives = selection
            .keys()
            .filter_map(|key| self.catalog.get(key))
            .flat_map(|product| product.alternatives.iter())
            .filter_map(|id| self.catalog.key(id));

        for key in alternatives {
            if suggestions.len() == MAX_CROSS_SELL {
                break;
            }

            if selection.contains(key) || seen.contains(&key) {
                continue;
            }

            let Some(product) = self.catalog.get(key) else {
                continue;
            };

            if diet.is_compatible(product) {
                seen.push(key);
                suggestions.push(product);
            }
        }

        suggestions
    }
}

/// Allocate a basket for `params` using `catalog` and `policy`.
///
/// # Errors
///
/// See [`Allocator::recommend`].
pub fn generate_recommendations<'c>(
    catalog: &'c Catalog,
    policy: &'c Policy,
    params: &RecommendationParams,
) -> Result<Recommendation<'c>, AllocationError> {
    Allocator::new(catalog, policy).recommend(params)
}

/// Mutable state of a single allocation run.
#[derive(Debug)]
struct Run<'c> {
    catalog: &'c Catalog,
    retailer: Retailer,
    quality: Quality,
    selection: Selection,
    total: Decimal,
    max_allowed: Decimal,
    target_min: Decimal,
}

impl Run<'_> {
    fn admit_essentials(&mut self, essentials: &[&str], candidates: &[Candidate<'_>]) {
        for id in essentials {
            let Some(candidate) = candidates
                .iter()
                .find(|candidate| candidate.product.id == *id)
            else {
                debug!(product = *id, "essential not in candidate pool");
                continue;
            };

            if self.selection.contains(candidate.key) {
                continue;
            }

            let admitted = self.admit(candidate);

            debug!(
                product = *id,
                cost = %candidate.min_cost,
                total = %self.total,
                admitted,
                "essential considered"
            );
        }
    }

    fn fill(&mut self, candidates: &[Candidate<'_>]) {
        for candidate in candidates {
            if self.selection.contains(candidate.key) {
                continue;
            }

            if self.admit(candidate) {
                debug!(
                    product = %candidate.product.id,
                    cost = %candidate.min_cost,
                    total = %self.total,
                    "product admitted"
                );
            }
        }
    }

    fn expand(&mut self, staples: &[String]) {
        while self.total < self.target_min {
            let mut increased = false;

            for id in staples {
                if self.total >= self.target_min {
                    break;
                }

                if let Some(key) = self.catalog.key(id) {
                    increased |= self.step_up(key);
                }
            }

            if !increased {
                let keys: Vec<ProductKey> = self.selection.keys().collect();

                for key in keys {
                    if self.total >= self.target_min {
                        break;
                    }

                    increased |= self.step_up(key);
                }
            }

            if !increased {
                debug!(
                    total = %self.total,
                    target_min = %self.target_min,
                    "expansion stalled below target"
                );
                break;
            }
        }
    }

    /// Admit a candidate at minimum quantity if it keeps the total under the ceiling.
    fn admit(&mut self, candidate: &Candidate<'_>) -> bool {
        let total = self.total + candidate.min_cost;

        if total > self.max_allowed {
            return false;
        }

        if self
            .selection
            .insert(candidate.key, candidate.product.quantity.min)
        {
            self.total = total;
            return true;
        }

        false
    }

    /// Advance a selected product by one quantity step if the increase is affordable.
    fn step_up(&mut self, key: ProductKey) -> bool {
        let Some(entry) = self.selection.get(key).copied() else {
            return false;
        };

        let Some(product) = self.catalog.get(key) else {
            return false;
        };

        if entry.quantity >= product.quantity.max {
            return false;
        }

        let quantity = product.quantity.step_up(entry.quantity);
        let delta = line_total(product, quantity, self.retailer, self.quality)
            - line_total(product, entry.quantity, self.retailer, self.quality);

        if self.total + delta > self.max_allowed {
            return false;
        }

        self.selection.set_quantity(key, quantity);
        self.total += delta;

        trace!(
            product = %product.id,
            %quantity,
            %delta,
            total = %self.total,
            "quantity stepped up"
        );

        true
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use crate::pricing::to_money;

    use super::*;

    fn fixtures() -> Result<(Catalog, Policy), crate::catalog::CatalogError> {
        let catalog = Catalog::embedded()?;
        let policy = Policy::embedded(&catalog)?;

        Ok((catalog, policy))
    }

    fn rupees(amount: i64) -> Money<'static, Currency> {
        Money::from_minor(amount * 100, INR)
    }

    fn ids<'a>(recommendation: &'a Recommendation<'_>) -> Vec<&'a str> {
        recommendation
            .items()
            .iter()
            .map(|item| item.product_id.as_str())
            .collect()
    }

    #[test]
    fn everyday_essentials_come_first() -> TestResult {
        let (catalog, policy) = fixtures()?;
        let allocator = Allocator::new(&catalog, &policy);

        let recommendation =
            allocator.recommend(&RecommendationParams::new(rupees(1000), "everyday"))?;
        let ids = ids(&recommendation);

        let essentials = [
            "rice-regular",
            "toor-dal",
            "sunflower-oil",
            "onions",
            "tomatoes",
            "potatoes",
            "turmeric",
            "salt",
        ];

        assert_eq!(ids.get(..8), Some(essentials.as_slice()));
        assert_eq!(recommendation.total_amount(), &rupees(971));
        assert_eq!(recommendation.saved_amount(), &rupees(29));

        Ok(())
    }

    #[test]
    fn unaffordable_essentials_are_skipped() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let recommendation = generate_recommendations(
            &catalog,
            &policy,
            &RecommendationParams::new(rupees(100), "gym"),
        )?;

        assert_eq!(ids(&recommendation), vec!["eggs", "curd"]);
        assert_eq!(recommendation.total_amount(), &rupees(83));

        Ok(())
    }

    #[test]
    fn subcategory_essentials_are_admitted() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let params = RecommendationParams::new(rupees(2000), "biryani").with_subcategory("mutton");
        let recommendation = generate_recommendations(&catalog, &policy, &params)?;

        assert_eq!(ids(&recommendation).get(8), Some(&"mutton"));

        Ok(())
    }

    #[test]
    fn zero_budget_is_empty() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let recommendation = generate_recommendations(
            &catalog,
            &policy,
            &RecommendationParams::new(rupees(0), "everyday"),
        )?;

        assert!(recommendation.is_empty());
        assert_eq!(recommendation.total_amount(), &rupees(0));
        assert_eq!(recommendation.saved_amount(), &rupees(0));
        assert!(recommendation.cross_sell().is_empty());

        Ok(())
    }

    #[test]
    fn negative_budget_is_saved_in_full() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let recommendation = generate_recommendations(
            &catalog,
            &policy,
            &RecommendationParams::new(rupees(-50), "everyday"),
        )?;

        assert!(recommendation.is_empty());
        assert_eq!(recommendation.saved_amount(), &rupees(-50));

        Ok(())
    }

    #[test]
    fn budget_below_every_candidate_is_empty() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let recommendation = generate_recommendations(
            &catalog,
            &policy,
            &RecommendationParams::new(rupees(10), "everyday"),
        )?;

        assert!(recommendation.is_empty());
        assert_eq!(recommendation.saved_amount(), &rupees(10));

        Ok(())
    }

    #[test]
    fn budget_currency_must_match_catalog() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let params = RecommendationParams::new(Money::from_minor(100_000, GBP), "everyday");
        let result = generate_recommendations(&catalog, &policy, &params);

        assert!(matches!(
            result,
            Err(AllocationError::CurrencyMismatch("GBP", "INR"))
        ));

        Ok(())
    }

    #[test]
    fn candidates_are_sorted_by_minimum_cost() -> TestResult {
        let (catalog, policy) = fixtures()?;
        let allocator = Allocator::new(&catalog, &policy);
        let params = RecommendationParams::new(rupees(1000), "everyday");
        let everyday = policy.purpose("everyday");

        let candidates = allocator.candidates(everyday, &params);

        assert!(!candidates.is_empty());
        assert!(
            candidates
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.min_cost <= b.min_cost))
        );
        assert!(
            candidates
                .iter()
                .all(|candidate| everyday.allows_category(&candidate.product.category))
        );

        Ok(())
    }

    #[test]
    fn vegan_candidates_exclude_dairy() -> TestResult {
        let (catalog, policy) = fixtures()?;
        let allocator = Allocator::new(&catalog, &policy);
        let params =
            RecommendationParams::new(rupees(1000), "everyday").with_diet(DietaryPreference::Vegan);

        let candidates = allocator.candidates(policy.purpose("everyday"), &params);

        assert!(candidates.iter().all(|c| c.product.tags.contains("vegan")));
        assert!(candidates.iter().all(|c| c.product.id != "milk"));

        Ok(())
    }

    #[test]
    fn expansion_reaches_target_without_crossing_ceiling() -> TestResult {
        let (catalog, policy) = fixtures()?;

        for budget in [500, 1000, 2000, 5000] {
            let recommendation = generate_recommendations(
                &catalog,
                &policy,
                &RecommendationParams::new(rupees(budget), "everyday"),
            )?;

            let total = from_money(recommendation.total_amount());
            let budget = Decimal::from(budget);

            assert!(total <= budget * BUDGET_CEILING);
            assert!(total >= budget * TARGET_FLOOR);
        }

        Ok(())
    }

    #[test]
    fn cross_sell_skips_selected_products() -> TestResult {
        let (catalog, policy) = fixtures()?;

        let recommendation = generate_recommendations(
            &catalog,
            &policy,
            &RecommendationParams::new(rupees(1000), "everyday"),
        )?;
        let selected = ids(&recommendation);

        let suggested: Vec<&str> = recommendation
            .cross_sell()
            .iter()
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(suggested, vec!["moong-dal", "chana-dal", "urad-dal"]);
        assert!(suggested.iter().all(|id| !selected.contains(id)));

        Ok(())
    }

    #[test]
    fn step_up_respects_ceiling() -> TestResult {
        let (catalog, _) = fixtures()?;
        let rice = catalog.key("rice-regular").ok_or("missing rice")?;

        let mut run = Run {
            catalog: &catalog,
            retailer: Retailer::DMart,
            quality: Quality::Budget,
            selection: Selection::new(),
            total: Decimal::from(55),
            max_allowed: Decimal::from(120),
            target_min: Decimal::from(100),
        };

        run.selection.insert(rice, Decimal::ONE);

        assert!(run.step_up(rice));
        assert_eq!(run.total, Decimal::from(110));
        assert!(!run.step_up(rice));
        assert_eq!(
            run.selection.get(rice).map(|e| e.quantity),
            Some(Decimal::TWO)
        );

        Ok(())
    }

    #[test]
    fn money_conversion_errors_surface_as_pricing_errors() {
        let err = AllocationError::from(PricingError::Unrepresentable(Decimal::MAX));

        assert!(matches!(err, AllocationError::Pricing(_)));
        assert!(to_money(Decimal::MAX, INR).is_err());
    }
}
