//! Batch completeness and rarity validation of a bundled collection

use crate::catalog::{TraitAlgorithm, TraitCatalog};
use crate::io::context::RunContext;
use crate::metadata::assembler::ProjectConstants;
use crate::metadata::record::TokenMetadata;
use crate::metadata::store::load_record;
use crate::metadata::translation::ValueMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parts-per-10000 scale of rarity figures
pub const RARITY_SCALE: u64 = 10_000;

/// Failure bucket of a validation report
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Expected image file absent
    MissingImages,
    /// Expected metadata file absent
    MissingMetadatas,
    /// Metadata file present but unreadable
    InvalidMetadatas,
    /// Value occurs less often than the configured minimum
    LowRarity,
    /// Catalog value never occurs in the batch
    MissingValues,
}

/// Categorized outcome of [`validate`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when no category recorded a failure
    pub success: bool,
    /// Failed items per category: token numbers or value names
    pub failures: BTreeMap<FailureCategory, Vec<String>>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            success: true,
            failures: BTreeMap::new(),
        }
    }

    fn record(&mut self, category: FailureCategory, item: impl ToString) {
        self.success = false;
        self.failures
            .entry(category)
            .or_default()
            .push(item.to_string());
    }

    /// Items recorded under a category
    pub fn failures_in(&self, category: FailureCategory) -> &[String] {
        self.failures
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Knobs of [`validate`]
#[derive(Clone, Debug, Default)]
pub struct ValidationOptions {
    /// Minimum rarity basis a value must reach; no rarity check when absent
    pub min_rarity_basis: Option<u64>,
    /// Translation applied to expected catalog values before comparison
    pub translation: Option<ValueMap>,
}

/// Occurrence frequency expressed in parts-per-10000, rounded down
pub const fn rarity_basis(occurrences: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    RARITY_SCALE * occurrences / total
}

/// Occurrence counts of trait types and values across a batch
#[derive(Clone, Debug, Default)]
pub struct RarityTally {
    trait_types: BTreeMap<String, u64>,
    trait_values: BTreeMap<String, u64>,
}

impl RarityTally {
    /// Empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every attribute of a record
    pub fn record(&mut self, metadata: &TokenMetadata) {
        for attribute in &metadata.attributes {
            *self
                .trait_types
                .entry(attribute.trait_type.clone())
                .or_default() += 1;
            *self
                .trait_values
                .entry(attribute.trait_value.clone())
                .or_default() += 1;
        }
    }

    /// Count `value` directly
    pub fn record_value(&mut self, value: &str, occurrences: u64) {
        *self.trait_values.entry(value.to_string()).or_default() += occurrences;
    }

    /// Occurrences of a value name
    pub fn value_count(&self, value: &str) -> u64 {
        self.trait_values.get(value).copied().unwrap_or(0)
    }

    /// Occurrences of a trait type
    pub fn type_count(&self, trait_type: &str) -> u64 {
        self.trait_types.get(trait_type).copied().unwrap_or(0)
    }

    /// Values whose rarity basis over `total` tokens is below `min_basis`
    ///
    /// A value exactly at the threshold passes.
    pub fn low_rarity(&self, total: u64, min_basis: u64) -> Vec<(String, u64)> {
        self.trait_values
            .iter()
            .map(|(value, &count)| (value.clone(), rarity_basis(count, total)))
            .filter(|(_, basis)| *basis < min_basis)
            .collect()
    }
}

/// Check a bundle directory of `{n}.{ext}` images and `{n}.json` records
///
/// Categories are accumulated independently; a missing metadata file only
/// removes that token from the rarity figures.
pub fn validate(
    catalog: &TraitCatalog,
    constants: &ProjectConstants,
    bundle_dir: &Path,
    options: &ValidationOptions,
    ctx: &RunContext,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let total = constants.num_tokens;

    for token in 0..total {
        if !bundle_dir.join(constants.image_file_name(token)).exists() {
            report.record(FailureCategory::MissingImages, token);
        }
    }

    let mut tally = RarityTally::new();
    for token in 0..total {
        let path = bundle_dir.join(format!("{token}.json"));
        if !path.exists() {
            report.record(FailureCategory::MissingMetadatas, token);
            continue;
        }
        match load_record(&path) {
            Ok(metadata) => tally.record(&metadata),
            Err(err) => {
                tracing::error!(parent: ctx.span(), token, error = %err, "unreadable metadata");
                report.record(FailureCategory::InvalidMetadatas, token);
            }
        }
    }

    if let Some(min_basis) = options.min_rarity_basis {
        tracing::info!(parent: ctx.span(), min_basis, "checking rarity");
        for (value, basis) in tally.low_rarity(total, min_basis) {
            tracing::debug!(parent: ctx.span(), value = %value, basis, "low rarity");
            report.record(FailureCategory::LowRarity, value);
        }
    }

    if catalog.algorithm() == TraitAlgorithm::Combo {
        let expected = catalog.all_values();
        tracing::info!(parent: ctx.span(), expected = expected.len(), "checking missing values");
        for raw in expected {
            let value = options
                .translation
                .as_ref()
                .map_or(raw, |t| t.translate_or_keep(raw));
            if tally.value_count(value) == 0 {
                tracing::error!(parent: ctx.span(), value = %value, "missing value");
                report.record(FailureCategory::MissingValues, value);
            }
        }
    } else {
        tracing::warn!(
            parent: ctx.span(),
            algorithm = ?catalog.algorithm(),
            "missing values check unsupported for this catalog"
        );
    }

    if report.success {
        tracing::info!(parent: ctx.span(), "validation succeeded");
    } else {
        tracing::error!(parent: ctx.span(), failures = ?report.failures, "validation failed");
    }
    report
}
