//! Modlets and the merged aggregate collection.

use crate::schema::Schemas;
use crate::service::{Service, Services};
use serde::{Deserialize, Serialize};

/// A named unit of configuration contributed to a composite model.
///
/// Identity within one loading pass is the `name`; the `model` field names
/// the composite model this modlet contributes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Modlet {
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, rename = "schema", skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Schemas>,
    #[serde(default, rename = "service", skip_serializing_if = "Option::is_none")]
    pub services: Option<Services>,
}

impl Modlet {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            vendor: None,
            version: None,
            schemas: None,
            services: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_schemas(mut self, schemas: Schemas) -> Self {
        self.schemas = Some(schemas);
        self
    }

    pub fn with_services(mut self, services: Services) -> Self {
        self.services = Some(services);
        self
    }
}

/// The aggregate: a merged, ordered collection of modlets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modlets(pub Vec<Modlet>);

impl Modlets {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, modlet: Modlet) {
        self.0.push(modlet);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modlet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a modlet by name.
    pub fn get(&self, name: &str) -> Option<&Modlet> {
        self.0.iter().find(|m| m.name == name)
    }

    /// Append every modlet of `other`, preserving order.
    pub fn merge(&mut self, other: Modlets) {
        self.0.extend(other.0);
    }

    /// All schemas contributed to `model`, in contribution order.
    ///
    /// Returns `None` when no modlet contributes a schema to the model.
    pub fn merged_schemas(&self, model: &str) -> Option<Schemas> {
        let merged: Schemas = self
            .0
            .iter()
            .filter(|m| m.model == model)
            .filter_map(|m| m.schemas.as_ref())
            .flat_map(|s| s.iter().cloned())
            .collect();

        if merged.is_empty() { None } else { Some(merged) }
    }

    /// All services registered under `identifier` for `model`, sorted by
    /// ordinal ascending with discovery order breaking ties.
    pub fn services_for(&self, model: &str, identifier: &str) -> Vec<&Service> {
        let mut matches: Vec<&Service> = self
            .0
            .iter()
            .filter(|m| m.model == model)
            .filter_map(|m| m.services.as_ref())
            .flat_map(|s| s.iter())
            .filter(|s| s.identifier == identifier)
            .collect();
        matches.sort_by_key(|s| s.ordinal);
        matches
    }

    /// Names of the models the aggregate contributes to, in first-seen order.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = Vec::new();
        for modlet in &self.0 {
            if !models.contains(&modlet.model.as_str()) {
                models.push(&modlet.model);
            }
        }
        models
    }
}

impl IntoIterator for Modlets {
    type Item = Modlet;
    type IntoIter = std::vec::IntoIter<Modlet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Modlet> for Modlets {
    fn from_iter<I: IntoIterator<Item = Modlet>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;

    fn modlet_with_schema(name: &str, model: &str, system_id: &str) -> Modlet {
        let mut schemas = Schemas::new();
        schemas.push(Schema::new(system_id));
        Modlet::new(name, model).with_schemas(schemas)
    }

    #[test]
    fn test_get_by_name() {
        let mut modlets = Modlets::new();
        modlets.push(Modlet::new("a", "m"));
        modlets.push(Modlet::new("b", "m"));

        assert!(modlets.get("a").is_some());
        assert!(modlets.get("missing").is_none());
    }

    #[test]
    fn test_merged_schemas_filters_by_model() {
        let mut modlets = Modlets::new();
        modlets.push(modlet_with_schema("a", "m1", "urn:s1"));
        modlets.push(modlet_with_schema("b", "m2", "urn:s2"));
        modlets.push(modlet_with_schema("c", "m1", "urn:s3"));

        let merged = modlets.merged_schemas("m1").unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.by_system_id("urn:s1").is_some());
        assert!(merged.by_system_id("urn:s3").is_some());
        assert!(merged.by_system_id("urn:s2").is_none());
    }

    #[test]
    fn test_merged_schemas_none_when_absent() {
        let mut modlets = Modlets::new();
        modlets.push(Modlet::new("a", "m"));

        assert!(modlets.merged_schemas("m").is_none());
    }

    #[test]
    fn test_services_for_sorted_across_modlets() {
        let mut s1 = Services::new();
        s1.push(Service::new("cap", "late").with_ordinal(20));
        let mut s2 = Services::new();
        s2.push(Service::new("cap", "early").with_ordinal(1));

        let mut modlets = Modlets::new();
        modlets.push(Modlet::new("a", "m").with_services(s1));
        modlets.push(Modlet::new("b", "m").with_services(s2));

        let resolved = modlets.services_for("m", "cap");
        let names: Vec<&str> = resolved.iter().map(|s| s.implementation.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn test_models_first_seen_order() {
        let mut modlets = Modlets::new();
        modlets.push(Modlet::new("a", "m2"));
        modlets.push(Modlet::new("b", "m1"));
        modlets.push(Modlet::new("c", "m2"));

        assert_eq!(modlets.models(), vec!["m2", "m1"]);
    }
}
