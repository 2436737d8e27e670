//! Maps a token's attributes to the ordered layer files it is composited from

use crate::catalog::table::find_sublevels;
use crate::catalog::{TraitAlgorithm, TraitCatalog, WeightedTable};
use crate::io::context::RunContext;
use crate::io::error::{Result, catalog_error};
use crate::metadata::record::TokenMetadata;
use std::path::{Path, PathBuf};

/// Ordered layer paths of one token, bottom layer first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePlan {
    /// Token the plan renders
    pub token: u64,
    /// Layer files in compositing order
    pub layers: Vec<PathBuf>,
}

/// Resolves layer paths under a project's `traits/` directory
#[derive(Clone, Debug)]
pub struct ImagePlanResolver {
    traits_dir: PathBuf,
    layer_extension: String,
}

impl ImagePlanResolver {
    /// Resolver for layers stored as `{traits_dir}/…/*.{layer_extension}`
    pub fn new(traits_dir: impl Into<PathBuf>, layer_extension: &str) -> Self {
        Self {
            traits_dir: traits_dir.into(),
            layer_extension: layer_extension.to_string(),
        }
    }

    /// Root directory of the layer images
    pub fn traits_dir(&self) -> &Path {
        &self.traits_dir
    }

    /// Build the plan of one record
    ///
    /// Hidden traits and traits the record does not carry contribute no layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ForgeError::Consistency`] when the record's identity is
    /// broken and [`crate::ForgeError::Catalog`] when a value cannot be placed
    /// in the catalog's folder layout.
    pub fn resolve(
        &self,
        catalog: &TraitCatalog,
        record: &TokenMetadata,
        ctx: &RunContext,
    ) -> Result<ImagePlan> {
        let token = record.check_identity()?;
        let attributes = record.flattened();

        let mut layers = Vec::new();
        for trait_type in catalog.trait_types() {
            if catalog.is_hidden(trait_type) {
                tracing::debug!(parent: ctx.span(), token, trait_type = %trait_type, "skip hidden trait");
                continue;
            }
            let Some(value) = attributes.get(trait_type) else {
                tracing::debug!(parent: ctx.span(), token, trait_type = %trait_type, "skip absent trait");
                continue;
            };
            let path = self.layer_path(catalog, trait_type, value, &attributes)?;
            tracing::debug!(parent: ctx.span(), token, path = %path.display(), "layer");
            layers.push(path);
        }

        Ok(ImagePlan { token, layers })
    }

    fn layer_path(
        &self,
        catalog: &TraitCatalog,
        trait_type: &str,
        value: &str,
        attributes: &std::collections::HashMap<String, String>,
    ) -> Result<PathBuf> {
        let ext = &self.layer_extension;
        let type_dir = self.traits_dir.join(trait_type);

        match catalog.algorithm() {
            TraitAlgorithm::Restricted if !catalog.is_restriction(trait_type) => {
                let restriction = catalog
                    .restriction()
                    .ok_or_else(|| catalog_error(&trait_type, &"no restriction trait configured"))?;
                let branch = attributes.get(restriction).ok_or_else(|| {
                    catalog_error(
                        &trait_type,
                        &format!("record carries no value for restriction '{restriction}'"),
                    )
                })?;
                Ok(type_dir.join(branch).join(format!("{value}.{ext}")))
            }
            TraitAlgorithm::Combo => {
                let Some(WeightedTable::Hierarchical(branches)) = catalog.table(trait_type) else {
                    return Err(catalog_error(&trait_type, &"combo layers need branch tables"));
                };
                let sublevels = find_sublevels(branches);
                let sublevel = sublevels.get(value).ok_or_else(|| {
                    catalog_error(&trait_type, &format!("value '{value}' is not in any branch"))
                })?;
                Ok(type_dir
                    .join(sublevel)
                    .join(format!("{trait_type}-{sublevel}-{value}.{ext}")))
            }
            _ => Ok(type_dir.join(format!("{value}.{ext}"))),
        }
    }
}
