//! Layer resolution and image compositing

/// Bottom-to-top alpha compositing and PNG export
pub mod composite;
/// Attribute → layer path resolution
pub mod plan;

pub use composite::{composite, save_png};
pub use plan::{ImagePlan, ImagePlanResolver};
