//! Contribution data model for the modlet framework.
//!
//! A [`Modlet`] is a named unit of configuration contributed to a larger
//! composite model. Modlets carry schema declarations and service
//! registrations; the [`Modlets`] collection is the merged aggregate the
//! rest of the framework discovers, transforms and validates.

pub mod model;
pub mod modlet;
pub mod report;
pub mod schema;
pub mod service;

/// Public id of the framework's own model, contributed by the seed modlet.
pub const MODEL_PUBLIC_ID: &str = "https://modlet.dev/model";

/// System id of the framework's own document schema.
pub const MODEL_SYSTEM_ID: &str = "https://modlet.dev/modlet.toml";

pub use model::Model;
pub use modlet::{Modlet, Modlets};
pub use report::{Diagnostic, Severity, ValidationReport};
pub use schema::{Schema, Schemas};
pub use service::{Property, Service, Services};
