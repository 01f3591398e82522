use thiserror::Error;
use varmodel::ModelError;

use crate::metadata::MetadataField;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse rules manifest '{file}': {source}")]
    ManifestParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Invalid coordinates in rules manifest '{file}': {source}")]
    InvalidCoordinates { source: ModelError, file: String },

    #[error("Failed to apply {field} rules to variant '{variant}': {reason}")]
    RuleFailed {
        field: MetadataField,
        variant: String,
        reason: String,
    },

    #[error("Base variant '{variant}' could not provide its {field}: {reason}")]
    BaseUnavailable {
        field: MetadataField,
        variant: String,
        reason: String,
    },

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

pub type MetaResult<T> = Result<T, MetaError>;
