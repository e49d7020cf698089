//! Grocer CLI

use std::{
    io::{self, Write},
    process,
};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use grocer::{
    allocation::{Allocator, RecommendationParams},
    catalog::Catalog,
    policy::Policy,
    pricing::to_money,
    shopping_list::ShoppingList,
};

use crate::config::{Command, CompareArgs, Config, PlanArgs};

mod config;

/// Grocer CLI entry point
pub fn main() {
    let config = Config::load().unwrap_or_else(|error| error.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Err(error) = run(config) {
        #[expect(
            clippy::print_stderr,
            reason = "errors are reported to the terminal, not the log"
        )]
        {
            eprintln!("Error: {error:#}");
        }

        process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    let catalog = match &config.catalog {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => Catalog::embedded().context("failed to load built-in catalog")?,
    };

    match config.command {
        Command::Plan(args) => {
            let policy = match &config.policy {
                Some(path) => Policy::from_path(path, &catalog)
                    .with_context(|| format!("failed to load policy from {}", path.display()))?,
                None => Policy::embedded(&catalog).context("failed to load built-in policy")?,
            };

            plan(&catalog, &policy, args)
        }
        Command::Compare(args) => compare(&catalog, &args),
    }
}

fn plan(catalog: &Catalog, policy: &Policy, args: PlanArgs) -> Result<()> {
    if !policy.is_known(&args.purpose) {
        warn!(
            purpose = %args.purpose,
            fallback = policy.default_purpose(),
            "unknown purpose, using fallback policy"
        );
    }

    let budget = to_money(args.budget, catalog.currency())?;

    let mut params = RecommendationParams::new(budget, args.purpose)
        .with_retailer(args.store)
        .with_quality(args.quality)
        .with_diet(args.diet);

    params.subcategory = args.subcategory;

    let recommendation = Allocator::new(catalog, policy).recommend(&params)?;

    info!(
        items = recommendation.len(),
        total = %recommendation.total_amount(),
        "recommendation ready"
    );

    let suggestions: Vec<String> = recommendation
        .cross_sell()
        .iter()
        .map(|product| format!("{} {}", product.glyph, product.name))
        .collect();

    let list = ShoppingList::from_recommendation(args.name, &params, recommendation);

    let mut out = io::stdout().lock();

    list.write_to(&mut out)?;

    if !suggestions.is_empty() {
        writeln!(out, " You might also like: {}\n", suggestions.join(", "))?;
    }

    Ok(())
}

fn compare(catalog: &Catalog, args: &CompareArgs) -> Result<()> {
    let comparison = catalog.compare(&args.product, args.quantity)?;

    comparison.write_to(io::stdout().lock())?;

    Ok(())
}
