//! Service registrations contributed by modlets.

use serde::{Deserialize, Serialize};

/// A textual configuration property of a service.
///
/// A property without a value is distinct from an absent property: it binds
/// "no value" to the target rather than attempting any conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn without_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A service registration: a named implementation fulfilling a logical
/// capability, with an ordinal sort key and declarative properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Logical capability name, e.g. the provider identifier of a model.
    pub identifier: String,
    /// Name of the implementation to instantiate.
    pub implementation: String,
    /// Sort key among services sharing an identifier. Lower runs first.
    #[serde(default)]
    pub ordinal: i32,
    /// Configuration properties bound onto the instantiated implementation.
    #[serde(default, rename = "property", skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl Service {
    pub fn new(identifier: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            implementation: implementation.into(),
            ordinal: 0,
            properties: Vec::new(),
        }
    }

    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// An ordered collection of service registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services(pub Vec<Service>);

impl Services {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, service: Service) {
        self.0.push(service);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All services registered under `identifier`, sorted by ordinal
    /// ascending. Equal ordinals keep their discovery order.
    pub fn by_identifier(&self, identifier: &str) -> Vec<&Service> {
        let mut matches: Vec<&Service> = self
            .0
            .iter()
            .filter(|s| s.identifier == identifier)
            .collect();
        matches.sort_by_key(|s| s.ordinal);
        matches
    }
}

impl IntoIterator for Services {
    type Item = Service;
    type IntoIter = std::vec::IntoIter<Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Service> for Services {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
