//! Document binding and transformation collaborators.
//!
//! The pipeline orchestrates two opaque services: "parse the resource at
//! location L into modlets" and "rewrite the aggregate with program P".
//! Both are specified here as traits so alternative wire formats can be
//! plugged in; [`TomlBinding`] is the shipped implementation reading TOML
//! `[[modlet]]` documents and `[[op]]` transformation programs.

pub mod error;
pub mod toml_binding;

use modlet_model::{Modlets, ValidationReport};

pub use error::{Error, Result};
pub use toml_binding::TomlBinding;

/// Parses and validates modlet documents, and compiles transformation
/// programs.
pub trait DocumentBinding: Send + Sync {
    /// Parse the document text found at `source_name` into modlets.
    ///
    /// With `validating` set, structural schema-conformance problems fail
    /// the parse instead of being deferred to the validation stage.
    fn parse_modlets(&self, text: &str, source_name: &str, validating: bool) -> Result<Modlets>;

    /// Check an aggregate for schema conformance, returning pass/fail plus
    /// structured diagnostics. Never fails for findings; only for inability
    /// to perform the check.
    fn validate(&self, modlets: &Modlets) -> Result<ValidationReport>;

    /// Compile the transformation program found at `source_name`.
    fn load_transform(&self, text: &str, source_name: &str) -> Result<Box<dyn TransformProgram>>;
}

/// A compiled transformation program rewriting one aggregate into another.
pub trait TransformProgram: Send + Sync {
    /// Where the program was loaded from, for diagnostics.
    fn source_name(&self) -> &str;

    /// Apply the program. An empty result is an error, never a silent
    /// replacement of the aggregate with nothing.
    fn apply(&self, modlets: &Modlets) -> Result<Modlets>;
}
