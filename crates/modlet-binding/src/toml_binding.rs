//! TOML document binding.
//!
//! Modlet documents are TOML files holding `[[modlet]]` tables:
//!
//! ```toml
//! [[modlet]]
//! name = "example"
//! model = "urn:example:model"
//!
//! [[modlet.schema]]
//! public-id = "urn:example:schema"
//! system-id = "urn:example:schema.toml"
//!
//! [[modlet.service]]
//! identifier = "urn:example:capability"
//! implementation = "example-impl"
//! ordinal = 10
//!
//! [[modlet.service.property]]
//! name = "enabled"
//! value = "true"
//! ```
//!
//! Transformation programs are TOML files holding an ordered `[[op]]` list;
//! each operation rewrites the aggregate and the output of one program
//! feeds the next.

use crate::{DocumentBinding, Error, Result, TransformProgram};
use modlet_model::{Diagnostic, Modlet, Modlets, ValidationReport};
use serde::Deserialize;

/// The shipped [`DocumentBinding`] over TOML documents.
#[derive(Debug, Clone, Default)]
pub struct TomlBinding;

impl TomlBinding {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default, rename = "modlet")]
    modlets: Vec<Modlet>,
}

/// Structural conformance findings for one modlet, as diagnostic messages.
fn conformance_problems(modlet: &Modlet) -> Vec<String> {
    let mut problems = Vec::new();
    if modlet.name.trim().is_empty() {
        problems.push("modlet has an empty name".to_string());
    }
    if modlet.model.trim().is_empty() {
        problems.push(format!("modlet '{}' has an empty model", modlet.name));
    }
    if let Some(schemas) = &modlet.schemas {
        for schema in schemas.iter() {
            if schema.system_id.trim().is_empty() {
                problems.push(format!(
                    "modlet '{}' declares a schema without a system-id",
                    modlet.name
                ));
            }
        }
    }
    if let Some(services) = &modlet.services {
        for service in services.iter() {
            if service.identifier.trim().is_empty() {
                problems.push(format!(
                    "modlet '{}' declares a service without an identifier",
                    modlet.name
                ));
            }
            if service.implementation.trim().is_empty() {
                problems.push(format!(
                    "modlet '{}' declares service '{}' without an implementation",
                    modlet.name, service.identifier
                ));
            }
            for property in &service.properties {
                if property.name.trim().is_empty() {
                    problems.push(format!(
                        "modlet '{}' service '{}' declares a nameless property",
                        modlet.name, service.identifier
                    ));
                }
            }
        }
    }
    problems
}

impl DocumentBinding for TomlBinding {
    fn parse_modlets(&self, text: &str, source_name: &str, validating: bool) -> Result<Modlets> {
        let document: Document = toml::from_str(text).map_err(|e| Error::DocumentParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        if validating {
            let problems: Vec<String> = document
                .modlets
                .iter()
                .flat_map(conformance_problems)
                .collect();
            if !problems.is_empty() {
                return Err(Error::DocumentInvalid {
                    source_name: source_name.to_string(),
                    problems: problems.join("; "),
                });
            }
        }

        tracing::debug!(
            source = source_name,
            modlets = document.modlets.len(),
            "parsed modlet document"
        );
        Ok(Modlets(document.modlets))
    }

    fn validate(&self, modlets: &Modlets) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        for modlet in modlets.iter() {
            for problem in conformance_problems(modlet) {
                report.add(
                    Diagnostic::error("schema-conformance", problem)
                        .with_element(modlet.name.clone()),
                );
            }
        }
        Ok(report)
    }

    fn load_transform(&self, text: &str, source_name: &str) -> Result<Box<dyn TransformProgram>> {
        let program: TransformDocument =
            toml::from_str(text).map_err(|e| Error::TransformParse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Ok(Box::new(TomlTransform {
            source_name: source_name.to_string(),
            ops: program.ops,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct TransformDocument {
    #[serde(default)]
    #[allow(dead_code)]
    description: Option<String>,
    #[serde(default, rename = "op")]
    ops: Vec<Op>,
}

/// One rewrite operation of a transformation program.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Op {
    /// Drop the modlet with the given name.
    ExcludeModlet { name: String },
    /// Rename a modlet.
    RenameModlet { from: String, to: String },
    /// Set the vendor of every modlet, optionally filtered by model.
    SetVendor {
        vendor: String,
        #[serde(default)]
        model: Option<String>,
    },
    /// Set the version of every modlet, optionally filtered by model.
    SetVersion {
        version: String,
        #[serde(default)]
        model: Option<String>,
    },
}

struct TomlTransform {
    source_name: String,
    ops: Vec<Op>,
}

impl TransformProgram for TomlTransform {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn apply(&self, modlets: &Modlets) -> Result<Modlets> {
        let mut result: Vec<Modlet> = modlets.iter().cloned().collect();
        for op in &self.ops {
            match op {
                Op::ExcludeModlet { name } => {
                    result.retain(|m| &m.name != name);
                }
                Op::RenameModlet { from, to } => {
                    for modlet in result.iter_mut().filter(|m| &m.name == from) {
                        modlet.name = to.clone();
                    }
                }
                Op::SetVendor { vendor, model } => {
                    for modlet in result
                        .iter_mut()
                        .filter(|m| model.as_deref().is_none_or(|id| m.model == id))
                    {
                        modlet.vendor = Some(vendor.clone());
                    }
                }
                Op::SetVersion { version, model } => {
                    for modlet in result
                        .iter_mut()
                        .filter(|m| model.as_deref().is_none_or(|id| m.model == id))
                    {
                        modlet.version = Some(version.clone());
                    }
                }
            }
        }

        if result.is_empty() {
            return Err(Error::EmptyTransformResult {
                source_name: self.source_name.clone(),
            });
        }
        Ok(Modlets(result))
    }
}
