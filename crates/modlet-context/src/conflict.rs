//! Duplicate-identity detection across the merged aggregate.
//!
//! Schemas contributed to one model must have unique public ids and unique
//! system ids. Violations are diagnostics, not errors; the validation stage
//! merges them into its report.

use modlet_model::{Diagnostic, Modlets, Schema};
use std::collections::HashMap;

/// Diagnostic identifier for colliding public ids.
pub const PUBLIC_ID_CONFLICT: &str = "schema-public-id-conflict";
/// Diagnostic identifier for colliding system ids.
pub const SYSTEM_ID_CONFLICT: &str = "schema-system-id-conflict";

#[derive(Default)]
struct ModelIndex<'a> {
    by_public_id: HashMap<&'a str, (&'a Schema, &'a str)>,
    by_system_id: HashMap<&'a str, (&'a Schema, &'a str)>,
}

/// Detect duplicate schema identities in the aggregate.
///
/// Both keys are checked independently, so two modlets colliding on both
/// `public_id` and `system_id` produce two diagnostics. The indices retain
/// the first entrant per key; every later entrant is reported against it.
/// Output order follows modlet iteration order, then schema order within
/// each modlet.
pub fn detect(modlets: &Modlets) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut models: HashMap<&str, ModelIndex<'_>> = HashMap::new();

    for modlet in modlets.iter() {
        let Some(schemas) = &modlet.schemas else {
            continue;
        };
        let index = models.entry(modlet.model.as_str()).or_default();

        for schema in schemas.iter() {
            if let Some(public_id) = schema.public_id.as_deref() {
                match index.by_public_id.get(public_id) {
                    Some((first, owner)) if *first != schema => {
                        diagnostics.push(
                            Diagnostic::error(
                                PUBLIC_ID_CONFLICT,
                                format!(
                                    "schema public id '{}' of modlet '{}' collides with modlet \
                                     '{}' in model '{}'",
                                    public_id, modlet.name, owner, modlet.model
                                ),
                            )
                            .with_element(modlet.name.clone()),
                        );
                    }
                    Some(_) => {}
                    None => {
                        index.by_public_id.insert(public_id, (schema, &modlet.name));
                    }
                }
            }

            match index.by_system_id.get(schema.system_id.as_str()) {
                Some((first, owner)) if *first != schema => {
                    diagnostics.push(
                        Diagnostic::error(
                            SYSTEM_ID_CONFLICT,
                            format!(
                                "schema system id '{}' of modlet '{}' collides with modlet '{}' \
                                 in model '{}'",
                                schema.system_id, modlet.name, owner, modlet.model
                            ),
                        )
                        .with_element(modlet.name.clone()),
                    );
                }
                Some(_) => {}
                None => {
                    index
                        .by_system_id
                        .insert(schema.system_id.as_str(), (schema, &modlet.name));
                }
            }
        }
    }

    diagnostics
}
