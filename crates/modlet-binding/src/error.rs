//! Error types for modlet-binding

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing documents or applying transformations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse modlet document {source_name}: {message}")]
    DocumentParse {
        source_name: String,
        message: String,
    },

    #[error("Modlet document {source_name} is not schema-conformant: {problems}")]
    DocumentInvalid {
        source_name: String,
        problems: String,
    },

    #[error("Failed to parse transformation program {source_name}: {message}")]
    TransformParse {
        source_name: String,
        message: String,
    },

    #[error("Transformation program {source_name} produced an empty aggregate")]
    EmptyTransformResult { source_name: String },
}
