//! Purpose Policies
//!
//! Maps a shopping purpose (`everyday`, `gym`, `biryani`, ...) to the product
//! categories it draws from and the essentials it tries to include first.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::catalog::{Catalog, CatalogError};

/// Policy shipped with the crate.
const EMBEDDED_POLICY: &str = include_str!("../fixtures/policy.yml");

/// Policy for a single purpose.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurposePolicy {
    /// Categories products may be drawn from
    pub categories: Vec<String>,

    /// Essential product identifiers, highest priority first
    pub essentials: Vec<String>,

    /// Subcategory (e.g. `mutton`) -> extra essentials appended after `essentials`
    #[serde(default)]
    pub subcategories: FxHashMap<String, Vec<String>>,

    /// Protein sources are called out as "High protein"
    #[serde(default)]
    pub protein_focus: bool,

    /// Diet-tagged products are called out as "Low calorie"
    #[serde(default)]
    pub calorie_conscious: bool,
}

impl PurposePolicy {
    /// Whether products of `category` may be selected for this purpose.
    pub fn allows_category(&self, category: &str) -> bool {
        self.categories.iter().any(|allowed| allowed == category)
    }
}

#[derive(Debug, Deserialize)]
struct PolicyFixture {
    default_purpose: String,
    staple_priority: Vec<String>,
    purposes: FxHashMap<String, PurposePolicy>,
}

/// Category & essentials policy for every purpose.
#[derive(Debug, Clone)]
pub struct Policy {
    purposes: FxHashMap<String, PurposePolicy>,
    default_purpose: String,
    fallback: PurposePolicy,
    staple_priority: Vec<String>,
}

impl Policy {
    /// Load the policy shipped with the crate, validated against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture refers to products missing from `catalog`.
    pub fn embedded(catalog: &Catalog) -> Result<Self, CatalogError> {
        Self::from_yaml(EMBEDDED_POLICY, catalog)
    }

    /// Load a policy from a YAML file, validated against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>, catalog: &Catalog) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents, catalog)
    }

    /// Load a policy from YAML source, validated against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, the default purpose is
    /// not defined, or any essential or staple refers to an unknown product.
    pub fn from_yaml(contents: &str, catalog: &Catalog) -> Result<Self, CatalogError> {
        let fixture: PolicyFixture = serde_norway::from_str(contents)?;

        let fallback = fixture
            .purposes
            .get(&fixture.default_purpose)
            .cloned()
            .ok_or_else(|| CatalogError::MissingDefaultPurpose(fixture.default_purpose.clone()))?;

        let policy = Policy {
            purposes: fixture.purposes,
            default_purpose: fixture.default_purpose,
            fallback,
            staple_priority: fixture.staple_priority,
        };

        policy.validate(catalog)?;

        Ok(policy)
    }

    fn validate(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let check = |context: String, ids: &[String]| {
            ids.iter()
                .find(|id| catalog.key(id).is_none())
                .map_or(Ok(()), |product| {
                    Err(CatalogError::UnknownPolicyProduct {
                        context,
                        product: product.clone(),
                    })
                })
        };

        check("staple priority".to_string(), &self.staple_priority)?;

        for (name, purpose) in &self.purposes {
            check(format!("{name} essentials"), &purpose.essentials)?;

            for (subcategory, essentials) in &purpose.subcategories {
                check(format!("{name}:{subcategory} essentials"), essentials)?;
            }
        }

        Ok(())
    }

    /// Policy for `purpose`, falling back to the default purpose when unknown.
    pub fn purpose(&self, purpose: &str) -> &PurposePolicy {
        self.purposes.get(purpose).unwrap_or(&self.fallback)
    }

    /// Whether `purpose` has its own policy.
    pub fn is_known(&self, purpose: &str) -> bool {
        self.purposes.contains_key(purpose)
    }

    /// Essentials for `purpose`, followed by the essentials of `subcategory` if
    /// that purpose defines any.
    ///
    /// Unknown purposes use the default purpose's essentials and never pick up
    /// subcategory essentials.
    pub fn essentials(&self, purpose: &str, subcategory: Option<&str>) -> SmallVec<[&str; 12]> {
        let Some(policy) = self.purposes.get(purpose) else {
            return self
                .fallback
                .essentials
                .iter()
                .map(String::as_str)
                .collect();
        };

        let extra = subcategory
            .and_then(|subcategory| policy.subcategories.get(subcategory))
            .map(Vec::as_slice)
            .unwrap_or_default();

        policy
            .essentials
            .iter()
            .chain(extra)
            .map(String::as_str)
            .collect()
    }

    /// Staples to grow first when a basket is under target, in priority order.
    pub fn staple_priority(&self) -> &[String] {
        &self.staple_priority
    }

    /// Name of the purpose used for unknown purposes.
    pub fn default_purpose(&self) -> &str {
        &self.default_purpose
    }

    /// Names of every configured purpose, sorted.
    pub fn purpose_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.purposes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn policy() -> Result<(Catalog, Policy), CatalogError> {
        let catalog = Catalog::embedded()?;
        let policy = Policy::embedded(&catalog)?;

        Ok((catalog, policy))
    }

    #[test]
    fn embedded_policy_loads() -> TestResult {
        let (_, policy) = policy()?;

        assert_eq!(policy.default_purpose(), "everyday");
        assert_eq!(policy.purpose_names().len(), 11);
        assert_eq!(
            policy.staple_priority().first().map(String::as_str),
            Some("rice-regular")
        );

        Ok(())
    }

    #[test]
    fn unknown_purpose_falls_back_to_everyday() -> TestResult {
        let (_, policy) = policy()?;

        let beverages = policy.purpose("beverages");

        assert!(!policy.is_known("beverages"));
        assert!(beverages.allows_category("spices"));
        assert!(!beverages.allows_category("beverages"));
        assert_eq!(
            policy.essentials("beverages", None).as_slice(),
            policy.essentials("everyday", None).as_slice()
        );

        Ok(())
    }

    #[test]
    fn subcategory_essentials_are_appended() -> TestResult {
        let (_, policy) = policy()?;

        let essentials = policy.essentials("biryani", Some("mutton"));

        assert_eq!(essentials.first(), Some(&"rice-basmati"));
        assert_eq!(essentials.last(), Some(&"mutton"));
        assert_eq!(essentials.len(), 9);

        Ok(())
    }

    #[test]
    fn unknown_subcategory_adds_nothing() -> TestResult {
        let (_, policy) = policy()?;

        assert_eq!(policy.essentials("biryani", Some("prawns")).len(), 8);
        assert_eq!(policy.essentials("gym", Some("mutton")).len(), 8);

        Ok(())
    }

    #[test]
    fn reason_flags() -> TestResult {
        let (_, policy) = policy()?;

        assert!(policy.purpose("gym").protein_focus);
        assert!(!policy.purpose("gym").calorie_conscious);
        assert!(policy.purpose("diet").protein_focus);
        assert!(policy.purpose("diet").calorie_conscious);
        assert!(!policy.purpose("everyday").protein_focus);

        Ok(())
    }

    #[test]
    fn unknown_essential_is_rejected() -> TestResult {
        let catalog = Catalog::embedded()?;
        let yaml = r"
default_purpose: everyday
staple_priority: []
purposes:
  everyday:
    categories: [grains]
    essentials: [rice-regular, caviar]
";

        let err = Policy::from_yaml(yaml, &catalog).err();

        assert!(matches!(
            err,
            Some(CatalogError::UnknownPolicyProduct { product, .. }) if product == "caviar"
        ));

        Ok(())
    }

    #[test]
    fn missing_default_purpose_is_rejected() -> TestResult {
        let catalog = Catalog::embedded()?;
        let yaml = r"
default_purpose: everyday
staple_priority: []
purposes:
  gym:
    categories: [gym]
    essentials: []
";

        let err = Policy::from_yaml(yaml, &catalog).err();

        assert!(matches!(err, Some(CatalogError::MissingDefaultPurpose(_))));

        Ok(())
    }
}
