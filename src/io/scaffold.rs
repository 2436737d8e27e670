//! Project folder layout and scaffolding

use crate::catalog::{TraitAlgorithm, TraitCatalog};
use crate::io::context::RunContext;
use crate::io::error::{Result, WithPath};
use std::path::{Path, PathBuf};

/// Well-known folders of one project
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Paths of `{working_dir}/{project}`
    pub fn new(working_dir: &Path, project: &str) -> Self {
        Self {
            root: working_dir.join(project),
        }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generated metadata documents
    pub fn metadata(&self) -> PathBuf {
        self.root.join("metadata")
    }

    /// Rendered images
    pub fn images(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Deployable bundle of matched pairs
    pub fn assets(&self) -> PathBuf {
        self.root.join("assets")
    }

    /// Translation tables
    pub fn translations(&self) -> PathBuf {
        self.root.join("translations")
    }

    /// Media-host tables
    pub fn media_hosts(&self) -> PathBuf {
        self.root.join("media_hosts")
    }

    /// Trait layer images
    pub fn traits(&self) -> PathBuf {
        self.root.join("traits")
    }

    /// CSV attribute source folder
    pub fn csv(&self) -> PathBuf {
        self.root.join("csv")
    }

    /// Deployment cache folder
    pub fn cache(&self) -> PathBuf {
        self.root.join(".cache")
    }
}

/// Folders the trait layers of `catalog` are expected in
pub fn trait_folders(paths: &ProjectPaths, catalog: &TraitCatalog) -> Vec<PathBuf> {
    let traits = paths.traits();
    let mut folders = Vec::new();

    for trait_type in catalog.trait_types() {
        let type_dir = traits.join(trait_type);
        match catalog.algorithm() {
            TraitAlgorithm::Basic => folders.push(type_dir),
            TraitAlgorithm::Restricted => {
                if catalog.is_restriction(trait_type) {
                    folders.push(type_dir);
                    continue;
                }
                let branches = catalog
                    .table(trait_type)
                    .map(crate::catalog::WeightedTable::branch_keys)
                    .unwrap_or_default();
                folders.extend(branches.into_iter().map(|b| type_dir.join(b)));
            }
            TraitAlgorithm::Combo => {
                if catalog.is_hidden(trait_type) {
                    continue;
                }
                let branches = catalog
                    .table(trait_type)
                    .map(crate::catalog::WeightedTable::branch_keys)
                    .unwrap_or_default();
                folders.extend(branches.into_iter().map(|b| type_dir.join(b)));
            }
            TraitAlgorithm::Csv => {}
        }
    }

    if catalog.algorithm() == TraitAlgorithm::Csv {
        folders.push(paths.csv());
    }
    folders
}

/// Create every folder a project needs; existing folders are left alone
///
/// # Errors
///
/// Returns [`crate::ForgeError::FileSystem`] if a folder cannot be created.
pub fn initialize_project(
    paths: &ProjectPaths,
    catalog: &TraitCatalog,
    ctx: &RunContext,
) -> Result<Vec<PathBuf>> {
    tracing::info!(parent: ctx.span(), root = %paths.root().display(), "initializing project folders");

    let mut folders = vec![
        paths.metadata(),
        paths.images(),
        paths.assets(),
        paths.translations(),
        paths.media_hosts(),
    ];
    folders.extend(trait_folders(paths, catalog));

    for folder in &folders {
        std::fs::create_dir_all(folder).with_path(folder, "create directory")?;
    }

    tracing::info!(
        parent: ctx.span(),
        "done, place your layer images in {}",
        paths.traits().display()
    );
    Ok(folders)
}
