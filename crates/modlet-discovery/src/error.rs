//! Error types for modlet-discovery

use std::path::PathBuf;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during resource location and provider discovery
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed override at {path}:{line}: expected key=value, got '{text}'")]
    MalformedOverride {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("No implementation named '{name}' for capability {capability} (declared in {declared_in})")]
    ImplementationNotFound {
        capability: String,
        name: String,
        declared_in: String,
    },

    #[error("'{name}' is not a {capability} implementation (declared in {declared_in})")]
    IllegalImplementation {
        capability: String,
        name: String,
        declared_in: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
