//! Error types and path context for catalog, generation and bundling operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum ForgeError {
    /// Project configuration is missing or still carries placeholder values
    Config {
        /// Description of what's wrong with the configuration
        reason: String,
    },

    /// Trait catalog is structurally invalid
    ///
    /// Raised before any token is generated since no token can be produced
    /// correctly from a broken catalog.
    Catalog {
        /// Trait type the problem was found in
        trait_type: String,
        /// Explanation of the structural problem
        reason: String,
    },

    /// A weighted-value table carries an unusable weight
    InvalidWeight {
        /// Trait type owning the table
        trait_type: String,
        /// Value (or branch) whose weight is invalid
        value: String,
        /// Explanation of why the weight is rejected
        reason: String,
    },

    /// Project-level fields were applied to a draft that already had them
    TemplateMisuse {
        /// First field found already populated
        field: &'static str,
    },

    /// Token number disagrees between display name, image and file uri
    Consistency {
        /// Display name of the offending record
        name: String,
        /// Which identity field disagreed
        reason: String,
    },

    /// Translation table has no entry for a trait value
    Translation {
        /// Trait value that could not be translated
        value: String,
    },

    /// Media-host rewrite could not be applied
    MediaHost {
        /// Explanation of the failure
        reason: String,
    },

    /// A layer image is absent or cannot be decoded
    MissingLayer {
        /// Path to the layer image
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Image plan resolved to zero layers
    EmptyPlan {
        /// Token whose plan was empty
        token: u64,
    },

    /// Failed to encode a rendered image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Metadata or config document could not be read or written as JSON
    Metadata {
        /// Path of the document
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// Start date string did not match `DD MMM YYYY HH:MM:SS GMT`
    DateParse {
        /// Rejected input
        input: String,
        /// Underlying parse error
        source: chrono::ParseError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Invocation parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for ForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "Invalid configuration: {reason}"),
            Self::Catalog { trait_type, reason } => {
                write!(f, "Invalid trait catalog at '{trait_type}': {reason}")
            }
            Self::InvalidWeight {
                trait_type,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Invalid weight for '{value}' in trait '{trait_type}': {reason}"
                )
            }
            Self::TemplateMisuse { field } => {
                write!(f, "Metadata draft already has '{field}' populated")
            }
            Self::Consistency { name, reason } => {
                write!(f, "Inconsistent token identity in '{name}': {reason}")
            }
            Self::Translation { value } => {
                write!(f, "Translation is missing an entry for '{value}'")
            }
            Self::MediaHost { reason } => write!(f, "Media host rewrite failed: {reason}"),
            Self::MissingLayer { path, source } => {
                write!(f, "Failed to load layer '{}': {source}", path.display())
            }
            Self::EmptyPlan { token } => {
                write!(f, "Image plan for token {token} has no layers")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::Metadata { path, source } => {
                write!(f, "Failed to process document '{}': {source}", path.display())
            }
            Self::DateParse { input, source } => {
                write!(f, "Failed to parse start date '{input}': {source}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for ForgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingLayer { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::Metadata { source, .. } => Some(source),
            Self::DateParse { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Attaches the offending path to raw I/O and JSON failures
pub trait WithPath<T> {
    /// Convert the error into a [`ForgeError`] naming `path` and `operation`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path context applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| ForgeError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl<T> WithPath<T> for std::result::Result<T, serde_json::Error> {
    fn with_path(self, path: &Path, _operation: &'static str) -> Result<T> {
        self.map_err(|source| ForgeError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl From<std::io::Error> for ForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ForgeError {
    ForgeError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a catalog structure error
pub fn catalog_error(trait_type: &impl ToString, reason: &impl ToString) -> ForgeError {
    ForgeError::Catalog {
        trait_type: trait_type.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a configuration error
pub fn config_error(reason: &impl ToString) -> ForgeError {
    ForgeError::Config {
        reason: reason.to_string(),
    }
}
