//! Generative trait-art pipeline: weighted attribute sampling over a layered
//! trait catalog, per-token metadata records and alpha-composited images
//!
//! The system samples one attribute set per token, assembles a metadata record
//! from it, resolves the record to an ordered stack of layer images and
//! composites them. A bundled collection can then be checked for completeness
//! and rarity.

#![forbid(unsafe_code)]

/// Attribute sampling and batch generation
pub mod algorithm;
/// Rarity and completeness validation of bundled collections
pub mod analysis;
/// Trait catalog and weighted-value tables
pub mod catalog;
/// Input/output operations and error handling
pub mod io;
/// Token metadata records and their persistence
pub mod metadata;
/// Layer resolution and image compositing
pub mod render;

pub use io::error::{ForgeError, Result};
