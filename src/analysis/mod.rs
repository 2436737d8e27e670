//! Collection-wide analysis of generated batches

/// Completeness and rarity validation of a bundle
pub mod rarity;

pub use rarity::{FailureCategory, ValidationOptions, ValidationReport, validate};
