//! Schema declarations contributed by modlets.

use serde::{Deserialize, Serialize};

/// A single schema declaration.
///
/// `system_id` is the location used for lookup and is required; the other
/// identifiers are optional logical or physical aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    /// Logical name, unique within one model's merged schema set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    /// Location identifier, unique within one model's merged schema set.
    pub system_id: String,
    /// Optional logical grouping key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    /// Optional physical resource path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classpath_id: Option<String>,
}

impl Schema {
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            public_id: None,
            system_id: system_id.into(),
            context_id: None,
            classpath_id: None,
        }
    }

    pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }
}

/// An ordered collection of schema declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schemas(pub Vec<Schema>);

impl Schemas {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, schema: Schema) {
        self.0.push(schema);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a schema by its public id.
    pub fn by_public_id(&self, public_id: &str) -> Option<&Schema> {
        self.0
            .iter()
            .find(|s| s.public_id.as_deref() == Some(public_id))
    }

    /// Look up a schema by its system id.
    pub fn by_system_id(&self, system_id: &str) -> Option<&Schema> {
        self.0.iter().find(|s| s.system_id == system_id)
    }
}

impl IntoIterator for Schemas {
    type Item = Schema;
    type IntoIter = std::vec::IntoIter<Schema>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Schema> for Schemas {
    fn from_iter<I: IntoIterator<Item = Schema>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_public_id() {
        let mut schemas = Schemas::new();
        schemas.push(Schema::new("urn:s1").with_public_id("urn:p1"));
        schemas.push(Schema::new("urn:s2"));

        assert!(schemas.by_public_id("urn:p1").is_some());
        assert!(schemas.by_public_id("urn:p2").is_none());
    }

    #[test]
    fn test_by_system_id() {
        let mut schemas = Schemas::new();
        schemas.push(Schema::new("urn:s1"));

        assert_eq!(schemas.by_system_id("urn:s1").unwrap().system_id, "urn:s1");
        assert!(schemas.by_system_id("urn:missing").is_none());
    }
}
