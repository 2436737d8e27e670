//! Weighted attribute sampling honoring restriction and wildcard hierarchies

use crate::algorithm::selection::RandomSelector;
use crate::catalog::table::{FlatTable, WILDCARD_BRANCH, WeightedTable};
use crate::catalog::{TraitAlgorithm, TraitCatalog};
use crate::io::context::RunContext;
use crate::io::error::{ForgeError, Result, catalog_error};
use std::collections::HashMap;

/// Fully resolved trait selection of one token, in catalog trait order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pairs: Vec<(String, String)>,
}

impl AttributeSet {
    /// Build from `(trait_type, value)` pairs, keeping their order
    pub const fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Selected value of a trait type
    pub fn get(&self, trait_type: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(t, _)| t == trait_type)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(trait_type, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Number of selected traits
    pub const fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no trait was selected
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn ordered(catalog: &TraitCatalog, mut chosen: HashMap<String, String>) -> Self {
        let pairs = catalog
            .trait_types()
            .iter()
            .filter_map(|t| chosen.remove(t).map(|v| (t.clone(), v)))
            .collect();
        Self { pairs }
    }
}

/// Attribute sampling strategy, selected by catalog shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Restriction traits first, then dependents from the matching branch
    Restricted,
    /// Wildcard `any` draws select the branches of dependent traits
    Wildcard,
}

impl SamplingStrategy {
    /// Pick the strategy matching the catalog's algorithm
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidParameter`] for CSV catalogs, whose
    /// attributes are read rather than sampled.
    pub fn for_catalog(catalog: &TraitCatalog) -> Result<Self> {
        match catalog.algorithm() {
            TraitAlgorithm::Basic | TraitAlgorithm::Restricted => Ok(Self::Restricted),
            TraitAlgorithm::Combo => Ok(Self::Wildcard),
            TraitAlgorithm::Csv => Err(crate::io::error::invalid_parameter(
                "trait_algorithm",
                &"csv",
                &"csv catalogs read attributes from csv/metadata.csv",
            )),
        }
    }

    /// Draw one attribute set
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidWeight`] when a table cannot be sampled and
    /// [`ForgeError::Catalog`] when a table has the wrong shape for the strategy.
    pub fn sample(
        self,
        catalog: &TraitCatalog,
        selector: &mut RandomSelector,
        ctx: &RunContext,
    ) -> Result<AttributeSet> {
        let chosen = match self {
            Self::Restricted => sample_restricted(catalog, selector, ctx)?,
            Self::Wildcard => sample_wildcard(catalog, selector, ctx)?,
        };
        Ok(AttributeSet::ordered(catalog, chosen))
    }
}

/// Draw one attribute set with the strategy the catalog calls for
///
/// # Errors
///
/// See [`SamplingStrategy::for_catalog`] and [`SamplingStrategy::sample`].
pub fn sample(
    catalog: &TraitCatalog,
    selector: &mut RandomSelector,
    ctx: &RunContext,
) -> Result<AttributeSet> {
    SamplingStrategy::for_catalog(catalog)?.sample(catalog, selector, ctx)
}

fn sample_restricted(
    catalog: &TraitCatalog,
    selector: &mut RandomSelector,
    ctx: &RunContext,
) -> Result<HashMap<String, String>> {
    let mut chosen = HashMap::new();

    // Restrictions are drawn first so dependents can look up their branch
    for trait_type in catalog.trait_types().iter().filter(|t| catalog.is_restriction(t)) {
        let table = flat_table(catalog, trait_type)?;
        chosen.insert(trait_type.clone(), draw(selector, trait_type, table)?);
    }

    for trait_type in catalog.trait_types().iter().filter(|t| !catalog.is_restriction(t)) {
        if catalog.restrictions().is_empty() {
            let table = flat_table(catalog, trait_type)?;
            chosen.insert(trait_type.clone(), draw(selector, trait_type, table)?);
            continue;
        }

        let table = table_of(catalog, trait_type)?;
        for restriction in catalog.restrictions() {
            let Some(branch_value) = chosen.get(restriction).cloned() else {
                continue;
            };
            match table.branch(&branch_value) {
                Some(branch) => {
                    chosen.insert(trait_type.clone(), draw(selector, trait_type, branch)?);
                }
                None => {
                    tracing::debug!(
                        parent: ctx.span(),
                        trait_type = %trait_type,
                        branch = %branch_value,
                        "no branch for restriction value, skipping trait"
                    );
                }
            }
        }
    }

    Ok(chosen)
}

fn sample_wildcard(
    catalog: &TraitCatalog,
    selector: &mut RandomSelector,
    ctx: &RunContext,
) -> Result<HashMap<String, String>> {
    let mut wildcards: Vec<String> = Vec::new();
    let mut chosen = HashMap::new();

    for trait_type in catalog.trait_types() {
        let Some(any) = table_of(catalog, trait_type)?.branch(WILDCARD_BRANCH) else {
            continue;
        };
        let value = draw(selector, trait_type, any)?;
        tracing::debug!(parent: ctx.span(), trait_type = %trait_type, value = %value, "wildcard selected");
        wildcards.push(value.clone());
        chosen.insert(trait_type.clone(), value);
    }

    for trait_type in catalog.trait_types() {
        let table = table_of(catalog, trait_type)?;
        for wildcard in &wildcards {
            if let Some(branch) = table.branch(wildcard) {
                chosen.insert(trait_type.clone(), draw(selector, trait_type, branch)?);
            }
        }
    }

    Ok(chosen)
}

fn table_of<'c>(catalog: &'c TraitCatalog, trait_type: &str) -> Result<&'c WeightedTable> {
    catalog
        .table(trait_type)
        .ok_or_else(|| catalog_error(&trait_type, &"missing weighted-value table"))
}

fn flat_table<'c>(catalog: &'c TraitCatalog, trait_type: &str) -> Result<&'c FlatTable> {
    table_of(catalog, trait_type)?
        .as_flat()
        .ok_or_else(|| catalog_error(&trait_type, &"expected a flat weighted-value table"))
}

fn draw(selector: &mut RandomSelector, trait_type: &str, table: &FlatTable) -> Result<String> {
    selector
        .choose(table)
        .map(str::to_string)
        .ok_or_else(|| ForgeError::InvalidWeight {
            trait_type: trait_type.to_string(),
            value: table.values().collect::<Vec<_>>().join(","),
            reason: "weights must sum to more than zero".to_string(),
        })
}
