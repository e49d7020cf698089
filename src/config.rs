//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grocer::{diet::DietaryPreference, pricing::Quality, retailers::Retailer};
use rust_decimal::Decimal;

/// Grocer configuration
#[derive(Debug, Parser)]
#[command(name = "grocer", about = "Budget-constrained grocery basket planner", long_about = None)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Catalog YAML file; the built-in catalog is used when omitted
    #[arg(long, global = true, env = "GROCER_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Purpose policy YAML file; the built-in policy is used when omitted
    #[arg(long, global = true, env = "GROCER_POLICY")]
    pub policy: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a shopping list for a budget
    Plan(PlanArgs),

    /// Compare the price of a product across stores
    Compare(CompareArgs),
}

/// Arguments for planning a shopping list
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Total budget, in the catalog currency
    #[arg(short, long, env = "GROCER_BUDGET")]
    pub budget: Decimal,

    /// Shopping purpose (everyday, breakfast, biryani, gym, ...)
    #[arg(short, long, env = "GROCER_PURPOSE", default_value = "everyday")]
    pub purpose: String,

    /// Store whose prices are used
    #[arg(short, long, env = "GROCER_STORE", default_value = "dmart")]
    pub store: Retailer,

    /// Quality tier (budget, premium)
    #[arg(short, long, env = "GROCER_QUALITY", default_value = "budget")]
    pub quality: Quality,

    /// Dietary preference (none, vegetarian, vegan, non-veg)
    #[arg(short, long, env = "GROCER_DIET", default_value = "none")]
    pub diet: DietaryPreference,

    /// Subcategory, e.g. `mutton` for a biryani
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Name of the shopping list
    #[arg(short, long, default_value = "Shopping list")]
    pub name: String,
}

/// Arguments for comparing store prices
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Catalog identifier of the product, e.g. `toor-dal`
    pub product: String,

    /// Quantity to price, in the product's unit
    #[arg(short = 'n', long, default_value = "1")]
    pub quantity: Decimal,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn plan_defaults() -> TestResult {
        let config = Config::try_parse_from(["grocer", "plan", "--budget", "1000"])?;

        let Command::Plan(args) = config.command else {
            panic!("Expected plan command");
        };

        assert_eq!(args.budget, Decimal::from(1000));
        assert_eq!(args.purpose, "everyday");
        assert_eq!(args.store, Retailer::DMart);
        assert_eq!(args.quality, Quality::Budget);
        assert_eq!(args.diet, DietaryPreference::None);
        assert!(args.subcategory.is_none());

        Ok(())
    }

    #[test]
    fn plan_with_every_option() -> TestResult {
        let config = Config::try_parse_from([
            "grocer",
            "plan",
            "--budget",
            "2000",
            "--purpose",
            "biryani",
            "--store",
            "blinkit",
            "--quality",
            "premium",
            "--diet",
            "non-veg",
            "--subcategory",
            "mutton",
            "--catalog",
            "catalog.yml",
        ])?;

        let Command::Plan(args) = config.command else {
            panic!("Expected plan command");
        };

        assert_eq!(args.store, Retailer::Blinkit);
        assert_eq!(args.quality, Quality::Premium);
        assert_eq!(args.diet, DietaryPreference::NonVeg);
        assert_eq!(args.subcategory.as_deref(), Some("mutton"));
        assert_eq!(config.catalog, Some(PathBuf::from("catalog.yml")));

        Ok(())
    }

    #[test]
    fn unknown_store_is_rejected() {
        let result = Config::try_parse_from([
            "grocer",
            "plan",
            "--budget",
            "500",
            "--store",
            "bigbasket",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn compare_arguments() -> TestResult {
        let config =
            Config::try_parse_from(["grocer", "compare", "toor-dal", "--quantity", "1.5"])?;

        let Command::Compare(args) = config.command else {
            panic!("Expected compare command");
        };

        assert_eq!(args.product, "toor-dal");
        assert_eq!(args.quantity, Decimal::new(15, 1));

        Ok(())
    }
}
