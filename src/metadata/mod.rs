//! Token metadata records: assembly, persistence and post-processing

/// Fresh per-token record construction from project constants
pub mod assembler;
/// Metaplex-style record types and identity checks
pub mod record;
/// `{token}.json` persistence with skip-existing, rename-into-place writes
pub mod store;
/// Translation and media-host rewriting
pub mod translation;

pub use assembler::{ProjectConstants, assemble};
pub use record::{Attribute, TokenMetadata, flatten_attributes};
pub use store::MetadataStore;
pub use translation::{MissingPolicy, ValueMap, apply_media_host, apply_translation};
