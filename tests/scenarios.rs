//! Integration tests for basket allocation scenarios

use std::thread;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::{Currency, INR}};
use testresult::TestResult;

use grocer::{
    allocation::{Allocator, RecommendationParams, generate_recommendations},
    catalog::{Catalog, CatalogError},
    diet::DietaryPreference,
    policy::Policy,
    pricing::{Quality, from_money, line_total},
    recommendation::{Reason, Recommendation},
    retailers::Retailer,
};

fn fixtures() -> Result<(Catalog, Policy), CatalogError> {
    let catalog = Catalog::embedded()?;
    let policy = Policy::embedded(&catalog)?;

    Ok((catalog, policy))
}

fn rupees(amount: i64) -> Money<'static, Currency> {
    Money::from_minor(amount * 100, INR)
}

fn product_ids<'a>(recommendation: &'a Recommendation<'_>) -> Vec<&'a str> {
    recommendation
        .items()
        .iter()
        .map(|item| item.product_id.as_str())
        .collect()
}

#[test]
fn everyday_basket_includes_every_essential() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let recommendation = generate_recommendations(
        &catalog,
        &policy,
        &RecommendationParams::new(rupees(1000), "everyday"),
    )?;
    let ids = product_ids(&recommendation);

    for essential in [
        "rice-regular",
        "toor-dal",
        "sunflower-oil",
        "onions",
        "tomatoes",
        "potatoes",
        "turmeric",
        "salt",
    ] {
        assert!(ids.contains(&essential), "missing {essential}");
    }

    let total = from_money(recommendation.total_amount());

    assert!(total >= Decimal::from(800));
    assert!(total <= Decimal::from(980));

    Ok(())
}

#[test]
fn gym_basket_on_a_tiny_budget_skips_chicken() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let recommendation = generate_recommendations(
        &catalog,
        &policy,
        &RecommendationParams::new(rupees(100), "gym"),
    )?;

    let total = from_money(recommendation.total_amount());

    assert_eq!(product_ids(&recommendation), ["eggs", "curd"]);
    assert_eq!(total, Decimal::from(83));
    assert!(total <= Decimal::from(98));

    Ok(())
}

#[test]
fn expansion_gives_up_below_target_when_no_step_fits() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let recommendation = generate_recommendations(
        &catalog,
        &policy,
        &RecommendationParams::new(rupees(80), "gym"),
    )?;

    let [eggs] = recommendation.items() else {
        panic!("Expected a single item");
    };

    assert_eq!(eggs.product_id, "eggs");
    assert_eq!(eggs.quantity, Decimal::from(6));
    assert_eq!(from_money(recommendation.total_amount()), Decimal::from(48));
    assert_eq!(from_money(recommendation.saved_amount()), Decimal::from(32));

    Ok(())
}

#[test]
fn mutton_biryani_includes_mutton() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let params = RecommendationParams::new(rupees(2000), "biryani").with_subcategory("mutton");
    let recommendation = generate_recommendations(&catalog, &policy, &params)?;

    assert!(product_ids(&recommendation).contains(&"mutton"));

    Ok(())
}

#[test]
fn vegetarian_diet_overrides_subcategory_essentials() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let params = RecommendationParams::new(rupees(2000), "biryani")
        .with_subcategory("mutton")
        .with_diet(DietaryPreference::Vegetarian);
    let recommendation = generate_recommendations(&catalog, &policy, &params)?;

    assert!(!product_ids(&recommendation).contains(&"mutton"));
    assert!(!recommendation.is_empty());

    Ok(())
}

#[test]
fn vegan_basket_only_contains_vegan_products() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let params = RecommendationParams::new(rupees(1000), "everyday")
        .with_retailer(Retailer::Reliance)
        .with_diet(DietaryPreference::Vegan);
    let recommendation = generate_recommendations(&catalog, &policy, &params)?;

    assert!(!recommendation.is_empty());

    for item in recommendation.items() {
        let product = catalog.product(&item.product_id)?;
        assert!(
            product.tags.contains("vegan"),
            "{} is not vegan",
            product.id
        );
    }

    for product in recommendation.cross_sell() {
        assert!(product.tags.contains("vegan"));
    }

    Ok(())
}

#[test]
fn premium_prices_every_line_with_the_markup() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let params = RecommendationParams::new(rupees(1000), "everyday").with_quality(Quality::Premium);
    let recommendation = generate_recommendations(&catalog, &policy, &params)?;

    for item in recommendation.items() {
        let product = catalog.product(&item.product_id)?;

        assert_eq!(
            from_money(&item.price),
            line_total(product, item.quantity, Retailer::DMart, Quality::Premium)
        );
    }

    let total = from_money(recommendation.total_amount());

    assert!(total <= Decimal::from(980));

    Ok(())
}

#[test]
fn large_budgets_grow_staples() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let recommendation = generate_recommendations(
        &catalog,
        &policy,
        &RecommendationParams::new(rupees(5000), "everyday"),
    )?;

    let rice = recommendation
        .items()
        .iter()
        .find(|item| item.product_id == "rice-regular")
        .ok_or("rice missing")?;

    assert!(rice.quantity > Decimal::ONE);
    assert_eq!(rice.reason, Some(Reason::EssentialStaple));

    let total = from_money(recommendation.total_amount());

    assert!(total >= Decimal::from(4000));

    Ok(())
}

#[test]
fn expansion_stops_when_nothing_can_grow() -> TestResult {
    let (catalog, policy) = fixtures()?;

    let recommendation = generate_recommendations(
        &catalog,
        &policy,
        &RecommendationParams::new(rupees(10_000), "snacks"),
    )?;

    for item in recommendation.items() {
        let product = catalog.product(&item.product_id)?;
        assert_eq!(item.quantity, product.quantity.max);
    }

    let total = from_money(recommendation.total_amount());

    assert!(total < Decimal::from(8000));

    Ok(())
}

#[test]
fn unknown_purpose_plans_like_everyday() -> TestResult {
    let (catalog, policy) = fixtures()?;
    let allocator = Allocator::new(&catalog, &policy);

    let everyday = allocator.recommend(&RecommendationParams::new(rupees(750), "everyday"))?;
    let unknown = allocator.recommend(&RecommendationParams::new(rupees(750), "picnic"))?;

    assert_eq!(everyday.items(), unknown.items());
    assert_eq!(everyday.total_amount(), unknown.total_amount());

    Ok(())
}

#[test]
fn totals_never_shrink_as_the_budget_grows() -> TestResult {
    let (catalog, policy) = fixtures()?;
    let allocator = Allocator::new(&catalog, &policy);

    for purpose in ["everyday", "gym", "biryani", "snacks"] {
        let mut previous = Decimal::ZERO;

        for budget in [
            0, 10, 50, 100, 200, 300, 500, 750, 1000, 1500, 2000, 3000, 5000,
        ] {
            let recommendation =
                allocator.recommend(&RecommendationParams::new(rupees(budget), purpose))?;
            let total = from_money(recommendation.total_amount());

            assert!(total >= previous, "{purpose} total shrank at {budget}");

            previous = total;
        }
    }

    Ok(())
}

#[test]
fn allocator_is_shared_across_threads() -> TestResult {
    let (catalog, policy) = fixtures()?;
    let allocator = Allocator::new(&catalog, &policy);
    let params = RecommendationParams::new(rupees(1500), "party");

    let expected = allocator.recommend(&params)?;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| allocator.recommend(&params)))
            .collect();

        for handle in handles {
            let Ok(Ok(recommendation)) = handle.join() else {
                return Err("allocation failed on a worker thread");
            };

            if recommendation.items() != expected.items() {
                return Err("worker thread produced a different basket");
            }
        }

        Ok(())
    })?;

    Ok(())
}
