pub mod product;
pub mod record;
pub mod prediction;

pub use product::ProductType;
pub use record::{FeatureRecord, FEATURE_NAMES, CATEGORICAL_FEATURES};
pub use prediction::Prediction;

use serde::Serialize;

/// Coarse classification of a [`PredictError`], stable across releases so
/// callers can branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnrecognizedCategory,
    InvalidInput,
    SchemaMismatch,
    ArtifactLoad,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedCategory => "unrecognized_category",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::SchemaMismatch => "schema_mismatch",
            ErrorKind::ArtifactLoad => "artifact_load",
        }
    }

    /// Caused by what the user submitted rather than by the deployed artifacts.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ErrorKind::UnrecognizedCategory | ErrorKind::InvalidInput)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("Unrecognized {field} value: '{value}'")]
    UnrecognizedCategory { field: String, value: String },
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::UnrecognizedCategory { .. } => ErrorKind::UnrecognizedCategory,
            PredictError::InvalidInput { .. } => ErrorKind::InvalidInput,
            PredictError::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            PredictError::ArtifactLoad { .. } => ErrorKind::ArtifactLoad,
        }
    }

    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        PredictError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unrecognized(field: &str, value: &str) -> Self {
        PredictError::UnrecognizedCategory {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type PredictResult<T> = Result<T, PredictError>;
