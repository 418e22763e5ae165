//! Ordered provider discovery.
//!
//! Resolves, for a capability type, the ordered list of implementation
//! names registered through the platform override file and through
//! provider-list resources on the search path. Platform entries always
//! precede search-path entries so a deployment can force-substitute or
//! prepend implementations without touching packaged resources.

use crate::locator::ResourceLocator;
use crate::platform::PlatformOverrides;
use crate::{Error, Result};

/// Outcome of classifying a discovered implementation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStatus {
    /// The name resolves to an implementation of the requested capability.
    Known,
    /// The name is registered, but under a different capability.
    WrongCapability,
    /// The name resolves to nothing.
    Unknown,
}

/// An implementation name together with the source that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredImplementation {
    pub name: String,
    /// Override key or resource path, for diagnostics.
    pub source: String,
}

/// Discovers implementation names for capability types.
#[derive(Debug, Clone)]
pub struct ProviderLoader {
    provider_location: String,
}

impl ProviderLoader {
    pub fn new(provider_location: impl Into<String>) -> Self {
        Self {
            provider_location: provider_location.into(),
        }
    }

    /// Resolve the ordered implementation list for `capability`.
    ///
    /// Platform override entries come first, in lexicographic order of
    /// their literal keys; entries from provider-list resources follow in
    /// encounter order. Every name is checked through `classify`; a name
    /// that cannot be resolved, or that belongs to another capability,
    /// aborts the whole load. Partial success is never returned.
    pub fn load(
        &self,
        capability: &str,
        locator: &dyn ResourceLocator,
        overrides: &PlatformOverrides,
        classify: impl Fn(&str) -> NameStatus,
    ) -> Result<Vec<DiscoveredImplementation>> {
        let mut discovered = Vec::new();

        for (key, value) in overrides.entries_for(capability) {
            discovered.push(DiscoveredImplementation {
                name: value.to_string(),
                source: key.to_string(),
            });
        }

        let location = format!("{}/{}", self.provider_location, capability);
        for resource in locator.find_resources(&location)? {
            let text = resource.read_to_string()?;
            for raw in text.lines() {
                // A line containing '#' anywhere is skipped whole, not
                // truncated at the comment marker.
                if raw.contains('#') {
                    continue;
                }
                let name = raw.trim();
                if name.is_empty() {
                    continue;
                }
                discovered.push(DiscoveredImplementation {
                    name: name.to_string(),
                    source: resource.path.display().to_string(),
                });
            }
        }

        for entry in &discovered {
            match classify(&entry.name) {
                NameStatus::Known => {}
                NameStatus::Unknown => {
                    return Err(Error::ImplementationNotFound {
                        capability: capability.to_string(),
                        name: entry.name.clone(),
                        declared_in: entry.source.clone(),
                    });
                }
                NameStatus::WrongCapability => {
                    return Err(Error::IllegalImplementation {
                        capability: capability.to_string(),
                        name: entry.name.clone(),
                        declared_in: entry.source.clone(),
                    });
                }
            }
        }

        tracing::debug!(capability, count = discovered.len(), "discovered implementations");
        Ok(discovered)
    }
}
