//! Trait catalog: ordered trait types, weighted tables, restrictions and hidden layers

use crate::catalog::table::{WILDCARD_BRANCH, WeightedTable};
use crate::io::error::{Result, catalog_error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How attributes are produced and where layer images live
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitAlgorithm {
    /// Flat tables, no restrictions
    Basic,
    /// One restriction trait gates branch tables of every other trait
    Restricted,
    /// Wildcard `any` branches select the branches of dependent traits
    Combo,
    /// Attributes come from a CSV file instead of sampling
    Csv,
}

/// Trait section of the config document, before validation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TraitDocument {
    /// Explicit algorithm; inferred from table shapes when absent
    #[serde(default)]
    pub trait_algorithm: Option<TraitAlgorithm>,
    /// Trait types, bottom layer first
    pub trait_types: Vec<String>,
    /// Raw weighted-value tables keyed by trait type
    #[serde(default)]
    pub trait_values: serde_json::Map<String, Value>,
    /// Trait types acting as branch selectors
    #[serde(default)]
    pub trait_restrictions: Vec<String>,
    /// Trait types excluded from compositing
    #[serde(default)]
    pub trait_hidden: Vec<String>,
    /// Name of the translation table under `translations/`
    #[serde(default)]
    pub trait_translation: Option<String>,
    /// Name of the media-host table under `media_hosts/`
    #[serde(default)]
    pub trait_media_host: Option<String>,
}

/// Validated trait taxonomy shared read-only by every token of a run
#[derive(Clone, Debug)]
pub struct TraitCatalog {
    algorithm: TraitAlgorithm,
    trait_types: Vec<String>,
    tables: HashMap<String, WeightedTable>,
    restrictions: Vec<String>,
    hidden: Vec<String>,
}

impl TraitCatalog {
    /// Convert and validate a trait document
    ///
    /// # Errors
    ///
    /// Returns [`crate::ForgeError::Catalog`] or [`crate::ForgeError::InvalidWeight`]
    /// when the document cannot yield correct tokens.
    pub fn from_document(doc: &TraitDocument) -> Result<Self> {
        if doc.trait_types.is_empty() {
            return Err(catalog_error(&"trait_types", &"at least one trait type is required"));
        }

        let mut tables = HashMap::new();
        for (trait_type, raw) in &doc.trait_values {
            if !doc.trait_types.contains(trait_type) {
                return Err(catalog_error(trait_type, &"not listed in trait_types"));
            }
            tables.insert(trait_type.clone(), WeightedTable::from_json(trait_type, raw)?);
        }

        for name in doc.trait_hidden.iter().chain(&doc.trait_restrictions) {
            if !doc.trait_types.contains(name) {
                return Err(catalog_error(name, &"not listed in trait_types"));
            }
        }

        // An explicit `basic` with restrictions samples like `restricted`
        let algorithm = match doc.trait_algorithm {
            Some(TraitAlgorithm::Basic) if !doc.trait_restrictions.is_empty() => {
                TraitAlgorithm::Restricted
            }
            Some(algorithm) => algorithm,
            None => infer_algorithm(&doc.trait_restrictions, &tables),
        };

        let catalog = Self {
            algorithm,
            trait_types: doc.trait_types.clone(),
            tables,
            restrictions: doc.trait_restrictions.clone(),
            hidden: doc.trait_hidden.clone(),
        };
        catalog.check_shape()?;
        Ok(catalog)
    }

    fn check_shape(&self) -> Result<()> {
        if self.algorithm == TraitAlgorithm::Csv {
            return Ok(());
        }

        for trait_type in &self.trait_types {
            if !self.tables.contains_key(trait_type) {
                return Err(catalog_error(trait_type, &"missing weighted-value table"));
            }
        }

        match self.algorithm {
            TraitAlgorithm::Basic => {
                for (trait_type, table) in &self.tables {
                    if table.as_flat().is_none() {
                        return Err(catalog_error(trait_type, &"basic catalogs need flat tables"));
                    }
                }
            }
            TraitAlgorithm::Restricted => self.check_restricted()?,
            TraitAlgorithm::Combo => {
                for (trait_type, table) in &self.tables {
                    if table.as_flat().is_some() {
                        return Err(catalog_error(trait_type, &"combo catalogs need branch tables"));
                    }
                }
            }
            TraitAlgorithm::Csv => {}
        }
        Ok(())
    }

    fn check_restricted(&self) -> Result<()> {
        let restriction = match self.restrictions.as_slice() {
            [single] => single,
            [] => {
                return Err(catalog_error(
                    &"trait_restrictions",
                    &"restricted catalogs need one restriction trait",
                ));
            }
            _ => {
                return Err(catalog_error(
                    &"trait_restrictions",
                    &"only a single restriction trait is supported",
                ));
            }
        };

        let restriction_table = self
            .tables
            .get(restriction)
            .and_then(WeightedTable::as_flat)
            .ok_or_else(|| catalog_error(restriction, &"restriction traits need a flat table"))?;

        for trait_type in self.trait_types.iter().filter(|t| *t != restriction) {
            let Some(table) = self.tables.get(trait_type) else {
                continue;
            };
            if table.as_flat().is_some() {
                return Err(catalog_error(
                    trait_type,
                    &format!("needs branch tables keyed by '{restriction}' values"),
                ));
            }
            for branch in table.branch_keys() {
                if !restriction_table.contains(branch) {
                    return Err(catalog_error(
                        trait_type,
                        &format!("branch '{branch}' is not a value of '{restriction}'"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Active algorithm
    pub const fn algorithm(&self) -> TraitAlgorithm {
        self.algorithm
    }

    /// Trait types in layer order, bottom first
    pub fn trait_types(&self) -> &[String] {
        &self.trait_types
    }

    /// Weighted table of a trait type
    pub fn table(&self, trait_type: &str) -> Option<&WeightedTable> {
        self.tables.get(trait_type)
    }

    /// Restriction trait types in catalog order
    pub fn restrictions(&self) -> &[String] {
        &self.restrictions
    }

    /// The single restriction trait of a restricted catalog
    pub fn restriction(&self) -> Option<&str> {
        self.restrictions.first().map(String::as_str)
    }

    /// Whether `trait_type` is a branch selector
    pub fn is_restriction(&self, trait_type: &str) -> bool {
        self.restrictions.iter().any(|r| r == trait_type)
    }

    /// Whether `trait_type` is excluded from compositing
    pub fn is_hidden(&self, trait_type: &str) -> bool {
        self.hidden.iter().any(|h| h == trait_type)
    }

    /// Every value defined in any table, deduplicated, in trait order
    pub fn all_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for trait_type in &self.trait_types {
            let Some(table) = self.tables.get(trait_type) else {
                continue;
            };
            for value in table.all_values() {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values
    }
}

fn infer_algorithm(restrictions: &[String], tables: &HashMap<String, WeightedTable>) -> TraitAlgorithm {
    if !restrictions.is_empty() {
        TraitAlgorithm::Restricted
    } else if tables
        .values()
        .any(|table| table.branch(WILDCARD_BRANCH).is_some())
    {
        TraitAlgorithm::Combo
    } else {
        TraitAlgorithm::Basic
    }
}
