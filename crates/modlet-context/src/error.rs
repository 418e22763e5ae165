//! Error types for modlet-context

use modlet_model::ValidationReport;

/// Result type for context operations
pub type Result<T> = std::result::Result<T, Error>;

/// The single error kind raised at the framework boundary.
///
/// Callers are expected to react uniformly (log and abort the operation);
/// the variants carry the distinguishing failure codes and causes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] modlet_discovery::Error),

    #[error("Service instantiation failed: {0}")]
    Factory(#[from] modlet_factory::Error),

    #[error("Document binding failed: {0}")]
    Binding(#[from] modlet_binding::Error),

    #[error("Aggregate validation failed:\n{report}")]
    InvalidModlets { report: ValidationReport },

    #[error("No schemas registered for model '{model}'")]
    MissingSchemas { model: String },
}
