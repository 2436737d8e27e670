//! Token metadata record in the Metaplex layout

use crate::io::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `{trait_type, trait_value}` pair of a record's attribute list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Trait type name
    pub trait_type: String,
    /// Selected value name
    pub trait_value: String,
}

/// Royalty recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator wallet address
    pub address: String,
    /// Percentage share; shares of a record sum to 100
    pub share: u8,
}

/// File reference of a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// MIME type, e.g. `image/png`
    #[serde(rename = "type")]
    pub kind: String,
    /// Relative file name or hosted URI
    pub uri: String,
}

/// Nested `properties` block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    /// Asset category, always `image`
    pub category: String,
    /// Royalty recipients
    pub creators: Vec<Creator>,
    /// File references, normally one
    pub files: Vec<FileRef>,
}

/// Immutable per-token metadata record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Attributes in trait order
    pub attributes: Vec<Attribute>,
    /// Collection name
    pub collection: String,
    /// Collection description
    pub description: String,
    /// Image file name, `{token}.{ext}`
    pub image: String,
    /// Display name, `{prefix} #{token}`
    pub name: String,
    /// Creators and files
    pub properties: Properties,
    /// Royalty in basis points (0–10000)
    pub seller_fee_basis_points: u16,
    /// Collection symbol
    pub symbol: String,
}

impl TokenMetadata {
    /// Attributes as a `trait_type → trait_value` mapping
    pub fn flattened(&self) -> HashMap<String, String> {
        flatten_attributes(&self.attributes)
    }

    /// Verify name, image and file uri agree on the token number
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Consistency`] naming the first field that disagrees
    /// or cannot be parsed.
    pub fn check_identity(&self) -> Result<u64> {
        let token = self
            .name
            .rsplit('#')
            .next()
            .and_then(|suffix| suffix.trim().parse::<u64>().ok())
            .ok_or_else(|| self.inconsistent("display name has no '#<number>' suffix"))?;

        match leading_integer(&self.image) {
            Some(n) if n == token => {}
            _ => {
                return Err(self.inconsistent(&format!(
                    "image '{}' does not match token {token}",
                    self.image
                )));
            }
        }

        let uri = self
            .properties
            .files
            .first()
            .map(|file| file.uri.as_str())
            .ok_or_else(|| self.inconsistent("record has no file reference"))?;
        match leading_integer(uri) {
            Some(n) if n == token => Ok(token),
            _ => Err(self.inconsistent(&format!("uri '{uri}' does not match token {token}"))),
        }
    }

    fn inconsistent(&self, reason: &str) -> ForgeError {
        ForgeError::Consistency {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Collapse an attribute list into a `trait_type → trait_value` mapping
pub fn flatten_attributes(attributes: &[Attribute]) -> HashMap<String, String> {
    attributes
        .iter()
        .map(|a| (a.trait_type.clone(), a.trait_value.clone()))
        .collect()
}

// "12.png" -> 12
fn leading_integer(file_name: &str) -> Option<u64> {
    file_name.split('.').next()?.parse().ok()
}
