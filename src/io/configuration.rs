//! Pipeline defaults and the JSON project configuration document

use crate::catalog::{TraitCatalog, TraitDocument};
use crate::io::error::{Result, WithPath, config_error};
use crate::metadata::assembler::ProjectConstants;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default project name
pub const DEFAULT_PROJECT: &str = "example";
/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
/// Default root directory holding project folders
pub const DEFAULT_WORKING_DIR: &str = "projects";
/// Default extension of rendered images
pub const DEFAULT_IMAGE_FORMAT: &str = "png";
/// Extension of trait layer images
pub const LAYER_EXTENSION: &str = "png";
/// Creator address placeholder that must be replaced before generating
pub const PLACEHOLDER_ADDRESS: &str = "REPLACEME";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

fn default_image_format() -> String {
    DEFAULT_IMAGE_FORMAT.to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKING_DIR)
}

/// `settings` section of a project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Collection size
    pub num_tokens: u64,
    /// Creator wallet address
    pub address: String,
    /// Display name prefix
    pub name_prefix: String,
    /// Collection description
    pub description: String,
    /// Collection symbol
    pub symbol: String,
    /// Collection name
    pub collection: String,
    /// Royalty in basis points
    pub seller_fee_basis_points: u16,
    /// Rendered image extension
    #[serde(default = "default_image_format")]
    pub image_format: String,
    /// Directory holding project folders, relative to the config file
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

impl Settings {
    /// Project constants used to assemble records
    pub fn constants(&self) -> ProjectConstants {
        ProjectConstants {
            collection: self.collection.clone(),
            description: self.description.clone(),
            symbol: self.symbol.clone(),
            seller_fee_basis_points: self.seller_fee_basis_points,
            creator_address: self.address.clone(),
            name_prefix: self.name_prefix.clone(),
            image_format: self.image_format.clone(),
            num_tokens: self.num_tokens,
        }
    }
}

/// `validation` section of a project
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Minimum rarity basis per value
    #[serde(default)]
    pub min_rarity_basis: Option<u64>,
}

/// One project entry of the configuration document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Collection-level settings
    pub settings: Settings,
    /// Trait catalog document
    pub traits: TraitDocument,
    /// Validation thresholds
    #[serde(default)]
    pub validation: ValidationSettings,
}

impl ProjectConfig {
    /// Validated trait catalog
    ///
    /// # Errors
    ///
    /// See [`TraitCatalog::from_document`].
    pub fn catalog(&self) -> Result<TraitCatalog> {
        TraitCatalog::from_document(&self.traits)
    }
}

/// Reject documents that cannot drive generation for `project`
///
/// # Errors
///
/// Returns [`crate::ForgeError::Config`] when the project is absent or its
/// creator address is still the placeholder.
pub fn validate_config(document: &Value, project: &str) -> Result<()> {
    let entry = document.get(project).ok_or_else(|| {
        config_error(&format!(
            "project '{project}' not found in config, maybe copy config.example.json"
        ))
    })?;

    let address = entry
        .get("settings")
        .and_then(|s| s.get("address"))
        .and_then(Value::as_str)
        .ok_or_else(|| config_error(&format!("project '{project}' has no settings.address")))?;
    if address == PLACEHOLDER_ADDRESS {
        return Err(config_error(&format!(
            "replace {PLACEHOLDER_ADDRESS} in settings.address of '{project}'"
        )));
    }
    Ok(())
}

/// Parse and validate the entry of `project` in a configuration document
///
/// # Errors
///
/// Returns the errors of [`validate_config`] and [`crate::ForgeError::Metadata`]
/// when the entry does not match the expected layout.
pub fn project_from_document(document: &Value, project: &str, path: &Path) -> Result<ProjectConfig> {
    validate_config(document, project)?;
    let entry = document.get(project).cloned().unwrap_or(Value::Null);
    serde_json::from_value(entry).with_path(path, "parse project config")
}

/// Load the configuration file and extract one project
///
/// # Errors
///
/// Returns [`crate::ForgeError::FileSystem`] if the file cannot be read and
/// the errors of [`project_from_document`].
pub fn load_config(path: &Path, project: &str) -> Result<ProjectConfig> {
    let text = std::fs::read_to_string(path).with_path(path, "read config")?;
    let document: Value = serde_json::from_str(&text).with_path(path, "parse config")?;
    project_from_document(&document, project, path)
}
