//! Weighted-value tables and branch inversion

use crate::io::error::{ForgeError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Branch name that marks a wildcard selector in combo catalogs
pub const WILDCARD_BRANCH: &str = "any";

/// Ordered value → weight mapping used for proportional random selection
///
/// Entry order follows the catalog document, which keeps branch inversion
/// and sampling reproducible for a given seed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatTable {
    entries: Vec<(String, f64)>,
}

impl FlatTable {
    /// Build a table from `(value, weight)` pairs
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidWeight`] if a weight is negative or not finite,
    /// or if the weights sum to zero.
    pub fn new(trait_type: &str, entries: Vec<(String, f64)>) -> Result<Self> {
        for (value, weight) in &entries {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ForgeError::InvalidWeight {
                    trait_type: trait_type.to_string(),
                    value: value.clone(),
                    reason: format!("weight {weight} must be a non-negative number"),
                });
            }
        }

        let table = Self { entries };
        if table.total_weight() <= 0.0 {
            return Err(ForgeError::InvalidWeight {
                trait_type: trait_type.to_string(),
                value: table.values().collect::<Vec<_>>().join(","),
                reason: "weights must sum to more than zero".to_string(),
            });
        }
        Ok(table)
    }

    /// Parse a JSON object of `value: weight` pairs
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidWeight`] for non-numeric weights and the
    /// errors of [`FlatTable::new`].
    pub fn from_json(trait_type: &str, object: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut entries = Vec::with_capacity(object.len());
        for (value, weight) in object {
            let weight = weight.as_f64().ok_or_else(|| ForgeError::InvalidWeight {
                trait_type: trait_type.to_string(),
                value: value.clone(),
                reason: format!("weight {weight} is not numeric"),
            })?;
            entries.push((value.clone(), weight));
        }
        Self::new(trait_type, entries)
    }

    /// Iterate value names in document order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(value, _)| value.as_str())
    }

    /// Weights aligned with [`FlatTable::values`]
    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, weight)| *weight).collect()
    }

    /// Value name at a position in document order
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(value, _)| value.as_str())
    }

    /// Whether the table defines `value`
    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|(v, _)| v == value)
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }

    /// Number of values
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no values
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Weighted-value table of a trait type, resolved once at catalog load
#[derive(Clone, Debug, PartialEq)]
pub enum WeightedTable {
    /// Direct value → weight mapping
    Flat(FlatTable),
    /// Branch key → flat table; the branch is picked by a restriction or wildcard value
    Hierarchical(Vec<(String, FlatTable)>),
}

impl WeightedTable {
    /// Classify and parse a JSON table
    ///
    /// A table whose entries are all objects is hierarchical; one whose entries
    /// are all scalars is flat. Mixed tables are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Catalog`] for mixed or non-object tables and the
    /// weight errors of [`FlatTable::from_json`].
    pub fn from_json(trait_type: &str, value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(ForgeError::Catalog {
                trait_type: trait_type.to_string(),
                reason: "weighted-value table must be an object".to_string(),
            });
        };

        let nested = object.values().filter(|v| v.is_object()).count();
        if nested == 0 {
            return FlatTable::from_json(trait_type, object).map(Self::Flat);
        }
        if nested != object.len() {
            return Err(ForgeError::Catalog {
                trait_type: trait_type.to_string(),
                reason: "table mixes weights and branches".to_string(),
            });
        }

        let mut branches = Vec::with_capacity(object.len());
        for (branch, inner) in object {
            let inner = inner.as_object().ok_or_else(|| ForgeError::Catalog {
                trait_type: trait_type.to_string(),
                reason: format!("branch '{branch}' must be an object"),
            })?;
            branches.push((branch.clone(), FlatTable::from_json(trait_type, inner)?));
        }
        Ok(Self::Hierarchical(branches))
    }

    /// Flat table, if this is one
    pub const fn as_flat(&self) -> Option<&FlatTable> {
        match self {
            Self::Flat(table) => Some(table),
            Self::Hierarchical(_) => None,
        }
    }

    /// Branch table keyed by `branch`, if hierarchical and present
    pub fn branch(&self, branch: &str) -> Option<&FlatTable> {
        match self {
            Self::Flat(_) => None,
            Self::Hierarchical(branches) => branches
                .iter()
                .find(|(key, _)| key == branch)
                .map(|(_, table)| table),
        }
    }

    /// Branch keys in document order (empty for flat tables)
    pub fn branch_keys(&self) -> Vec<&str> {
        match self {
            Self::Flat(_) => Vec::new(),
            Self::Hierarchical(branches) => branches.iter().map(|(key, _)| key.as_str()).collect(),
        }
    }

    /// Every value name defined anywhere in the table
    pub fn all_values(&self) -> Vec<&str> {
        match self {
            Self::Flat(table) => table.values().collect(),
            Self::Hierarchical(branches) => {
                branches.iter().flat_map(|(_, table)| table.values()).collect()
            }
        }
    }
}

/// Invert `{branch: {value: weight}}` into `value → branch`
///
/// When a value appears under several branches the last branch in document
/// order wins.
pub fn find_sublevels(branches: &[(String, FlatTable)]) -> HashMap<String, String> {
    let mut sublevels = HashMap::new();
    for (branch, table) in branches {
        for value in table.values() {
            sublevels.insert(value.to_string(), branch.clone());
        }
    }
    sublevels
}
