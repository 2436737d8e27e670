//! Builds a fresh metadata record per token from project constants and sampled attributes

use crate::algorithm::sampler::AttributeSet;
use crate::io::configuration::DEFAULT_IMAGE_FORMAT;
use crate::io::error::{ForgeError, Result, invalid_parameter};
use crate::metadata::record::{Attribute, Creator, FileRef, Properties, TokenMetadata};

/// Maximum royalty in basis points
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Project-level values shared by every token of a collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectConstants {
    /// Collection name
    pub collection: String,
    /// Collection description
    pub description: String,
    /// Collection symbol
    pub symbol: String,
    /// Royalty in basis points
    pub seller_fee_basis_points: u16,
    /// Creator wallet address, receiving the full share
    pub creator_address: String,
    /// Display name prefix, rendered as `{prefix} #{token}`
    pub name_prefix: String,
    /// Output image extension
    pub image_format: String,
    /// Collection size N; tokens are numbered `0..N`
    pub num_tokens: u64,
}

impl ProjectConstants {
    /// Check value ranges before any record is built
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidParameter`] for an out-of-range royalty, an
    /// empty name prefix or an empty image format.
    pub fn validate(&self) -> Result<()> {
        if self.seller_fee_basis_points > MAX_BASIS_POINTS {
            return Err(invalid_parameter(
                "seller_fee_basis_points",
                &self.seller_fee_basis_points,
                &format!("must be at most {MAX_BASIS_POINTS}"),
            ));
        }
        if self.name_prefix.is_empty() {
            return Err(invalid_parameter("name_prefix", &"", &"must not be empty"));
        }
        if self.image_format.is_empty() {
            return Err(invalid_parameter("image_format", &"", &"must not be empty"));
        }
        Ok(())
    }

    /// Image file name of a token
    pub fn image_file_name(&self, token: u64) -> String {
        format!("{token}.{}", self.image_format)
    }
}

impl Default for ProjectConstants {
    fn default() -> Self {
        Self {
            collection: String::new(),
            description: String::new(),
            symbol: String::new(),
            seller_fee_basis_points: 0,
            creator_address: String::new(),
            name_prefix: String::new(),
            image_format: DEFAULT_IMAGE_FORMAT.to_string(),
            num_tokens: 0,
        }
    }
}

/// Partially filled record; every field starts empty
#[derive(Debug, Default)]
pub struct MetadataDraft {
    collection: Option<String>,
    description: Option<String>,
    symbol: Option<String>,
    seller_fee_basis_points: Option<u16>,
    creators: Option<Vec<Creator>>,
    token: Option<(String, String, Vec<FileRef>, Vec<Attribute>)>,
}

impl MetadataDraft {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the project-level fields
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::TemplateMisuse`] if any project field is already set.
    pub fn apply_project(&mut self, constants: &ProjectConstants) -> Result<()> {
        let populated = [
            ("collection", self.collection.is_some()),
            ("description", self.description.is_some()),
            ("symbol", self.symbol.is_some()),
            ("seller_fee_basis_points", self.seller_fee_basis_points.is_some()),
            ("creators", self.creators.is_some()),
        ];
        if let Some(field) = populated.iter().find(|(_, set)| *set).map(|(field, _)| *field) {
            return Err(ForgeError::TemplateMisuse { field });
        }

        self.collection = Some(constants.collection.clone());
        self.description = Some(constants.description.clone());
        self.symbol = Some(constants.symbol.clone());
        self.seller_fee_basis_points = Some(constants.seller_fee_basis_points);
        self.creators = Some(vec![Creator {
            address: constants.creator_address.clone(),
            share: 100,
        }]);
        Ok(())
    }

    /// Fill the token-specific fields, replacing any earlier token values
    pub fn apply_token(&mut self, constants: &ProjectConstants, token: u64, attributes: &AttributeSet) {
        let image = constants.image_file_name(token);
        let name = format!("{} #{token}", constants.name_prefix);
        let files = vec![FileRef {
            kind: format!("image/{}", constants.image_format),
            uri: image.clone(),
        }];
        let attributes = attributes
            .iter()
            .map(|(trait_type, trait_value)| Attribute {
                trait_type: trait_type.to_string(),
                trait_value: trait_value.to_string(),
            })
            .collect();
        self.token = Some((image, name, files, attributes));
    }

    /// Turn the draft into an immutable record
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::TemplateMisuse`] naming the first field never filled.
    pub fn finish(self) -> Result<TokenMetadata> {
        let missing = |field: &'static str| ForgeError::TemplateMisuse { field };
        let (image, name, files, attributes) = self.token.ok_or_else(|| missing("name"))?;
        Ok(TokenMetadata {
            attributes,
            collection: self.collection.ok_or_else(|| missing("collection"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            image,
            name,
            properties: Properties {
                category: "image".to_string(),
                creators: self.creators.ok_or_else(|| missing("creators"))?,
                files,
            },
            seller_fee_basis_points: self
                .seller_fee_basis_points
                .ok_or_else(|| missing("seller_fee_basis_points"))?,
            symbol: self.symbol.ok_or_else(|| missing("symbol"))?,
        })
    }
}

/// Assemble the record of one token
///
/// Deterministic and side-effect free; persistence is
/// [`crate::metadata::store::MetadataStore::save_batch`].
///
/// # Errors
///
/// Propagates [`MetadataDraft`] errors.
pub fn assemble(
    constants: &ProjectConstants,
    token: u64,
    attributes: &AttributeSet,
) -> Result<TokenMetadata> {
    let mut draft = MetadataDraft::new();
    draft.apply_project(constants)?;
    draft.apply_token(constants, token, attributes);
    draft.finish()
}
