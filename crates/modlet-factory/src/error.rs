//! Error types for modlet-factory

/// Result type for factory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while instantiating and configuring service objects
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No service implementation named '{name}'")]
    ServiceNotFound { name: String },

    #[error("'{name}' does not implement the requested capability")]
    IllegalService { name: String },

    #[error("No property '{property}' declared by '{implementation}'")]
    GetterNotFound {
        implementation: String,
        property: String,
    },

    #[error("Property '{property}' of '{implementation}' is read-only")]
    SetterNotFound {
        implementation: String,
        property: String,
    },

    #[error("Cannot coerce '{value}' to {kind} for property '{property}' of '{implementation}'")]
    UnsupportedPropertyType {
        implementation: String,
        property: String,
        kind: String,
        value: String,
    },

    #[error("Failed to bind property '{property}' of '{implementation}': {message}")]
    PropertyBinding {
        implementation: String,
        property: String,
        message: String,
    },
}
