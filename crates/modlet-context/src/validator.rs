//! The built-in Validate stage.

use crate::conflict;
use crate::context::ModelContext;
use crate::registry::ModletValidator;
use crate::Result;
use modlet_factory::{Configurable, PropertyKind, PropertyTable, PropertyValue};
use modlet_model::{Modlets, Severity, ValidationReport};

/// Context attribute overriding whether the validator runs.
pub const ENABLED_ATTRIBUTE: &str = "modlet.validator.enabled";
/// Context attribute overriding the validator's sort key.
pub const ORDINAL_ATTRIBUTE: &str = "modlet.validator.ordinal";

/// Runs schema-conformance validation through the document binding, then
/// the duplicate-identity check, merging both into one report.
#[derive(Debug, Clone, Default)]
pub struct DefaultModletValidator {
    enabled: Option<bool>,
    ordinal: Option<i32>,
}

impl DefaultModletValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    fn effective_enabled(&self, context: &ModelContext) -> bool {
        self.enabled
            .or_else(|| context.flag_attribute(ENABLED_ATTRIBUTE))
            .unwrap_or(context.defaults().enabled)
    }
}

impl ModletValidator for DefaultModletValidator {
    fn validate_modlets(
        &self,
        context: &ModelContext,
        modlets: &Modlets,
    ) -> Result<Option<ValidationReport>> {
        if !self.effective_enabled(context) {
            context.log(Severity::Info, "modlet validator disabled, skipping");
            return Ok(None);
        }

        let mut report = context.binding().validate(modlets)?;
        for diagnostic in conflict::detect(modlets) {
            report.add(diagnostic);
        }
        Ok(Some(report))
    }

    fn ordinal(&self, context: &ModelContext) -> i32 {
        self.ordinal
            .or_else(|| context.int_attribute(ORDINAL_ATTRIBUTE))
            .unwrap_or(0)
    }
}

impl Configurable for DefaultModletValidator {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::<Self>::new()
            .writable("enabled", PropertyKind::Bool, |p, v| {
                p.enabled = v.and_then(PropertyValue::into_bool);
            })
            .writable("ordinal", PropertyKind::int32(), |p, v| {
                p.ordinal = v.and_then(PropertyValue::into_int).map(|i| i as i32);
            })
    }
}
