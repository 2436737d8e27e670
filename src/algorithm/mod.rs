//! Generation algorithm: random selection, attribute sampling and batch execution

/// Batch metadata and image generation with per-token error isolation
pub mod executor;
/// Weighted attribute sampling strategies
pub mod sampler;
/// Seeded weighted random selection
pub mod selection;
