//! Value translation and media-host rewriting of finished records

use crate::io::csv_source::table_reader;
use crate::io::error::{ForgeError, Result, WithPath, invalid_parameter};
use crate::metadata::record::TokenMetadata;
use std::collections::HashMap;
use std::path::Path;

/// What to do when a key has no entry in a lookup table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail the whole operation
    #[default]
    Fail,
    /// Leave the original value in place
    PassThrough,
}

/// One-to-one `raw → display` mapping loaded from a two-column CSV
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: HashMap<String, String>,
}

impl ValueMap {
    /// Build from pairs
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidParameter`] when a key repeats.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = HashMap::new();
        for (key, value) in pairs {
            if entries.contains_key(&key) {
                return Err(invalid_parameter(
                    "translation",
                    &key,
                    &"duplicate key",
                ));
            }
            entries.insert(key, value.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Parse CSV text; the first line is a header and is skipped
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidParameter`] for malformed rows, rows
    /// without exactly two columns and duplicate keys.
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for record in table_reader(text).records() {
            let record = record.map_err(|err| invalid_parameter("translation", &"csv", &err))?;
            match (record.get(0), record.get(1), record.len()) {
                (Some(key), Some(value), 2) => pairs.push((key.to_string(), value.to_string())),
                _ => {
                    return Err(invalid_parameter(
                        "translation",
                        &record.iter().collect::<Vec<_>>().join(","),
                        &"rows need exactly two columns",
                    ));
                }
            }
        }
        Self::from_pairs(pairs)
    }

    /// Load `{dir}/{name}.csv`; a missing file yields `None`
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::FileSystem`] for unreadable files and the parse
    /// errors of [`ValueMap::parse_csv`].
    pub fn load(dir: &Path, name: &str) -> Result<Option<Self>> {
        let path = dir.join(format!("{name}.csv"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse_csv(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_path(&path, "read value map"),
        }
    }

    /// Mapped value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Mapped value of `key`, or `key` itself
    pub fn translate_or_keep<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrite every attribute value through `translation`
///
/// With no translation (or an empty one) the record is returned unchanged.
///
/// # Errors
///
/// Returns [`ForgeError::Translation`] for an untranslatable value under
/// [`MissingPolicy::Fail`].
pub fn apply_translation(
    metadata: &TokenMetadata,
    translation: Option<&ValueMap>,
    policy: MissingPolicy,
) -> Result<TokenMetadata> {
    let Some(translation) = translation.filter(|t| !t.is_empty()) else {
        return Ok(metadata.clone());
    };

    let mut translated = metadata.clone();
    for attribute in &mut translated.attributes {
        match (translation.get(&attribute.trait_value), policy) {
            (Some(value), _) => attribute.trait_value = value.trim().to_string(),
            (None, MissingPolicy::PassThrough) => {}
            (None, MissingPolicy::Fail) => {
                return Err(ForgeError::Translation {
                    value: attribute.trait_value.clone(),
                });
            }
        }
    }
    Ok(translated)
}

/// Point `image` and the single file uri at a hosted location
///
/// With no media host the record is returned unchanged; under
/// [`MissingPolicy::PassThrough`] an unknown image also leaves it unchanged.
///
/// # Errors
///
/// Returns [`ForgeError::MediaHost`] for an unknown image under
/// [`MissingPolicy::Fail`] or when the record does not carry exactly one file.
pub fn apply_media_host(
    metadata: &TokenMetadata,
    media_host: Option<&ValueMap>,
    policy: MissingPolicy,
) -> Result<TokenMetadata> {
    let Some(media_host) = media_host.filter(|m| !m.is_empty()) else {
        return Ok(metadata.clone());
    };

    let Some(uri) = media_host.get(&metadata.image) else {
        return match policy {
            MissingPolicy::Fail => Err(ForgeError::MediaHost {
                reason: format!("missing '{}' in media host", metadata.image),
            }),
            MissingPolicy::PassThrough => Ok(metadata.clone()),
        };
    };

    let mut hosted = metadata.clone();
    let [file] = hosted.properties.files.as_mut_slice() else {
        return Err(ForgeError::MediaHost {
            reason: format!(
                "'{}' has {} file references, expected exactly one",
                metadata.name,
                metadata.properties.files.len()
            ),
        });
    };
    file.uri = uri.to_string();
    hosted.image = uri.to_string();
    Ok(hosted)
}
