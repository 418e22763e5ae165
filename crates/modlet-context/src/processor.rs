//! The built-in Process stage.

use crate::context::ModelContext;
use crate::registry::ModletProcessor;
use crate::Result;
use modlet_factory::{Configurable, PropertyKind, PropertyTable, PropertyValue};
use modlet_model::{Modlets, Severity};

/// Context attribute overriding whether the processor runs.
pub const ENABLED_ATTRIBUTE: &str = "modlet.processor.enabled";
/// Context attribute overriding the transformation program location.
pub const LOCATION_ATTRIBUTE: &str = "modlet.processor.location";
/// Context attribute overriding the processor's sort key.
pub const ORDINAL_ATTRIBUTE: &str = "modlet.processor.ordinal";

/// Applies the transformation programs found on the search path, threading
/// each program's output into the next.
#[derive(Debug, Clone, Default)]
pub struct DefaultModletProcessor {
    enabled: Option<bool>,
    location: Option<String>,
    ordinal: Option<i32>,
}

impl DefaultModletProcessor {
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

    fn effective_enabled(&self, context: &ModelContext) -> bool {
        self.enabled
            .or_else(|| context.flag_attribute(ENABLED_ATTRIBUTE))
            .unwrap_or(context.defaults().enabled)
    }

    fn effective_location(&self, context: &ModelContext) -> String {
        self.location
            .clone()
            .or_else(|| context.text_attribute(LOCATION_ATTRIBUTE))
            .unwrap_or_else(|| context.defaults().transform_location.clone())
    }
}

impl ModletProcessor for DefaultModletProcessor {
    fn process_modlets(
        &self,
        context: &ModelContext,
        modlets: &Modlets,
    ) -> Result<Option<Modlets>> {
        if !self.effective_enabled(context) {
            context.log(Severity::Info, "modlet processor disabled, skipping");
            return Ok(None);
        }

        let location = self.effective_location(context);
        let resources = context.locator().find_resources(&location)?;
        if resources.is_empty() {
            // No programs configured; the stage is a no-op.
            return Ok(None);
        }

        let mut current = modlets.clone();
        for resource in &resources {
            let text = resource.read_to_string()?;
            let program = context
                .binding()
                .load_transform(&text, &resource.path.display().to_string())?;
            current = program.apply(&current)?;
        }
        tracing::debug!(location, programs = resources.len(), "processed modlets");
        Ok(Some(current))
    }

    fn ordinal(&self, context: &ModelContext) -> i32 {
        self.ordinal
            .or_else(|| context.int_attribute(ORDINAL_ATTRIBUTE))
            .unwrap_or(0)
    }
}

impl Configurable for DefaultModletProcessor {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::<Self>::new()
            .writable("enabled", PropertyKind::Bool, |p, v| {
                p.enabled = v.and_then(PropertyValue::into_bool);
            })
            .writable("location", PropertyKind::Text, |p, v| {
                p.location = v.and_then(PropertyValue::into_text);
            })
            .writable("ordinal", PropertyKind::int32(), |p, v| {
                p.ordinal = v.and_then(PropertyValue::into_int).map(|i| i as i32);
            })
    }
}
