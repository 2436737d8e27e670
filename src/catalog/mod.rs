//! Trait taxonomy: weighted tables and the validated catalog

/// Flat and hierarchical weighted-value tables
pub mod table;
/// Catalog document conversion and structural validation
pub mod traits;

pub use table::{FlatTable, WeightedTable, find_sublevels};
pub use traits::{TraitAlgorithm, TraitCatalog, TraitDocument};
