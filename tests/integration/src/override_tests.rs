//! Platform override and configuration precedence scenarios.

use modlet_context::{
    DefaultModletProvider, Error, ImplementationRegistry, ModelContext, ModletProvider, Result,
};
use modlet_model::{Modlet, Modlets};
use modlet_test_utils::Workspace;
use pretty_assertions::assert_eq;

/// Appends a marker modlet so invocation order is observable.
struct MarkerProvider {
    marker: &'static str,
}

impl ModletProvider for MarkerProvider {
    fn find_modlets(&self, _: &ModelContext, current: &Modlets) -> Result<Option<Modlets>> {
        let mut next = current.clone();
        next.push(Modlet::new(self.marker, "urn:markers"));
        Ok(Some(next))
    }
}

fn marker_registry(names: &[&'static str]) -> ImplementationRegistry {
    let mut registry = ImplementationRegistry::with_defaults();
    for name in names {
        let marker = *name;
        registry.register_provider_with(marker, move |_| {
            Ok(Box::new(MarkerProvider { marker }))
        });
    }
    registry
}

fn marker_order(modlets: &Modlets) -> Vec<&str> {
    modlets
        .iter()
        .filter(|m| m.model == "urn:markers")
        .map(|m| m.name.as_str())
        .collect()
}

#[test]
fn test_platform_entries_run_before_packaged_entries() {
    let workspace = Workspace::new();
    workspace.write_provider_list("ModletProvider", &["packaged"]);
    workspace.write_overrides("ModletProvider.0=forced\n");

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(marker_registry(&["packaged", "forced"]))
        .build();

    let modlets = context.modlets().unwrap();
    assert_eq!(marker_order(&modlets), vec!["forced", "packaged"]);
}

#[test]
fn test_platform_entries_ordered_by_literal_key() {
    let workspace = Workspace::new();
    workspace.write_overrides("ModletProvider.1=b\nModletProvider.0=a\n");

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(marker_registry(&["a", "b"]))
        .build();

    let modlets = context.modlets().unwrap();
    assert_eq!(marker_order(&modlets), vec!["a", "b"]);
}

#[test]
fn test_unresolvable_override_aborts_discovery() {
    let workspace = Workspace::new();
    workspace.write_overrides("ModletProvider.0=ghost\n");

    let context = ModelContext::builder().locator(workspace.search_path()).build();

    let err = context.modlets().unwrap_err();
    assert!(matches!(
        err,
        Error::Discovery(modlet_discovery::Error::ImplementationNotFound { .. })
    ));
}

#[test]
fn test_wrong_capability_override_aborts_discovery() {
    let workspace = Workspace::new();
    // "default" resolves for every capability, but a validator name in a
    // provider slot must still be rejected.
    workspace.write_overrides("ModletProvider.0=strict-validator\n");

    let mut registry = ImplementationRegistry::with_defaults();
    registry.register_validator::<modlet_context::DefaultModletValidator>("strict-validator");
    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry)
        .build();

    let err = context.modlets().unwrap_err();
    assert!(matches!(
        err,
        Error::Discovery(modlet_discovery::Error::IllegalImplementation { .. })
    ));
}

#[test]
fn test_explicit_setting_beats_context_attribute() {
    let workspace = Workspace::new();
    workspace.write_file("explicit/doc.toml", "[[modlet]]\nname = \"E\"\nmodel = \"m\"\n");
    workspace.write_file("attr/doc.toml", "[[modlet]]\nname = \"A\"\nmodel = \"m\"\n");
    workspace.write_provider_list("ModletProvider", &["pinned"]);

    let mut registry = ImplementationRegistry::with_defaults();
    registry.register_provider_with("pinned", |_| {
        Ok(Box::new(DefaultModletProvider::new().with_location("explicit")))
    });
    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry)
        .build();
    context.set_text_attribute(modlet_context::provider::LOCATION_ATTRIBUTE, "attr");

    let modlets = context.modlets().unwrap();
    assert!(modlets.get("E").is_some(), "explicit location wins");
    assert!(modlets.get("A").is_none());
}

#[test]
fn test_attribute_beats_global_default() {
    let workspace = Workspace::new();
    workspace.write_document("doc.toml", "[[modlet]]\nname = \"D\"\nmodel = \"m\"\n");
    workspace.write_file("attr/doc.toml", "[[modlet]]\nname = \"A\"\nmodel = \"m\"\n");

    let context = ModelContext::builder().locator(workspace.search_path()).build();
    context.set_text_attribute(modlet_context::provider::LOCATION_ATTRIBUTE, "attr");

    let modlets = context.modlets().unwrap();
    assert!(modlets.get("A").is_some(), "attribute beats the default location");
    assert!(modlets.get("D").is_none());
}

#[test]
fn test_validating_attribute_defers_conformance_to_validation_stage() {
    let workspace = Workspace::new();
    // Structurally broken: empty model identifier.
    workspace.write_document("bad.toml", "[[modlet]]\nname = \"bad\"\nmodel = \"\"\n");

    // With validation during parse (the default), the Find stage fails.
    let strict = ModelContext::builder().locator(workspace.search_path()).build();
    assert!(matches!(strict.modlets().unwrap_err(), Error::Binding(_)));

    // With parsing validation off, the document loads and the Validate
    // stage reports the problem instead.
    let lenient = ModelContext::builder().locator(workspace.search_path()).build();
    lenient.set_flag_attribute(modlet_context::provider::VALIDATING_ATTRIBUTE, false);
    match lenient.modlets().unwrap_err() {
        Error::InvalidModlets { report } => {
            assert_eq!(report.diagnostics("schema-conformance").len(), 1);
        }
        other => panic!("expected InvalidModlets, got {other}"),
    }
}

#[test]
fn test_provider_list_hash_comment_lines_ignored_end_to_end() {
    let workspace = Workspace::new();
    workspace.write_file(
        "modlet/providers/ModletProvider",
        "# header\nmarker-a # trailing comment makes the whole line vanish\nmarker-b\n",
    );

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(marker_registry(&["marker-a", "marker-b"]))
        .build();

    let modlets = context.modlets().unwrap();
    assert_eq!(marker_order(&modlets), vec!["marker-b"]);
}
