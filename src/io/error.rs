use thiserror::Error;

/// Shape errors for files that parse as JSON but are not what the caller expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid GeoJSON: expected FeatureCollection, got {found}")]
    NotFeatureCollection { found: String },

    #[error("Invalid GeoJSON: missing features array")]
    MissingFeatures,

    #[error("Invalid summary: expected a JSON object")]
    NotAnObject,
}
