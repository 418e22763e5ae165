//! The built-in Find provider.

use crate::context::ModelContext;
use crate::registry::ModletProvider;
use crate::Result;
use modlet_factory::{Configurable, PropertyKind, PropertyTable, PropertyValue};
use modlet_model::{Modlets, Severity};

/// Context attribute overriding whether the provider runs.
pub const ENABLED_ATTRIBUTE: &str = "modlet.provider.enabled";
/// Context attribute overriding the document location.
pub const LOCATION_ATTRIBUTE: &str = "modlet.provider.location";
/// Context attribute overriding document validation during parse.
pub const VALIDATING_ATTRIBUTE: &str = "modlet.provider.validating";
/// Context attribute overriding the provider's sort key.
pub const ORDINAL_ATTRIBUTE: &str = "modlet.provider.ordinal";

/// Discovers modlet documents on the search path and merges them into the
/// accumulator.
///
/// Every knob resolves with the precedence: explicit setting on this
/// instance, then context attribute, then the context-wide default.
#[derive(Debug, Clone, Default)]
pub struct DefaultModletProvider {
    enabled: Option<bool>,
    location: Option<String>,
    validating: Option<bool>,
    ordinal: Option<i32>,
}

impl DefaultModletProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_validating(mut self, validating: bool) -> Self {
        self.validating = Some(validating);
        self
    }

    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    fn effective_enabled(&self, context: &ModelContext) -> bool {
        self.enabled
            .or_else(|| context.flag_attribute(ENABLED_ATTRIBUTE))
            .unwrap_or(context.defaults().enabled)
    }

    fn effective_location(&self, context: &ModelContext) -> String {
        self.location
            .clone()
            .or_else(|| context.text_attribute(LOCATION_ATTRIBUTE))
            .unwrap_or_else(|| context.defaults().document_location.clone())
    }

    fn effective_validating(&self, context: &ModelContext) -> bool {
        self.validating
            .or_else(|| context.flag_attribute(VALIDATING_ATTRIBUTE))
            .unwrap_or(context.defaults().validating)
    }
}

impl ModletProvider for DefaultModletProvider {
    fn find_modlets(&self, context: &ModelContext, current: &Modlets) -> Result<Option<Modlets>> {
        if !self.effective_enabled(context) {
            context.log(Severity::Info, "modlet provider disabled, skipping");
            return Ok(None);
        }

        let location = self.effective_location(context);
        let validating = self.effective_validating(context);
        let resources = context.locator().find_resources(&location)?;
        if resources.is_empty() {
            // Absence of documents is "no change", not an empty aggregate.
            return Ok(None);
        }

        let mut accumulator = current.clone();
        for resource in &resources {
            let text = resource.read_to_string()?;
            let found = context.binding().parse_modlets(
                &text,
                &resource.path.display().to_string(),
                validating,
            )?;
            accumulator.merge(found);
        }
        tracing::debug!(
            location,
            documents = resources.len(),
            modlets = accumulator.len(),
            "found modlets"
        );
        Ok(Some(accumulator))
    }

    fn ordinal(&self, context: &ModelContext) -> i32 {
        self.ordinal
            .or_else(|| context.int_attribute(ORDINAL_ATTRIBUTE))
            .unwrap_or(0)
    }
}

impl Configurable for DefaultModletProvider {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::<Self>::new()
            .writable("enabled", PropertyKind::Bool, |p, v| {
                p.enabled = v.and_then(PropertyValue::into_bool);
            })
            .writable("location", PropertyKind::Text, |p, v| {
                p.location = v.and_then(PropertyValue::into_text);
            })
            .writable("validating", PropertyKind::Bool, |p, v| {
                p.validating = v.and_then(PropertyValue::into_bool);
            })
            .writable("ordinal", PropertyKind::int32(), |p, v| {
                p.ordinal = v.and_then(PropertyValue::into_int).map(|i| i as i32);
            })
    }
}
