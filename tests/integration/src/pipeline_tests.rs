//! End-to-end pipeline scenarios: discovery through validation.

use modlet_context::{
    Error, ImplementationRegistry, ModelContext, ModletProvider, Result,
};
use modlet_factory::{Configurable, PropertyKind, PropertyTable, PropertyValue};
use modlet_model::{Modlet, Modlets, Schema, Schemas, Service};
use modlet_test_utils::Workspace;
use pretty_assertions::assert_eq;

/// A Find provider contributing one fixed modlet.
struct FixedProvider {
    modlet: Modlet,
}

impl ModletProvider for FixedProvider {
    fn find_modlets(&self, _: &ModelContext, current: &Modlets) -> Result<Option<Modlets>> {
        let mut next = current.clone();
        next.push(self.modlet.clone());
        Ok(Some(next))
    }
}

fn schema_modlet(name: &str, model: &str, public_id: &str, system_id: &str) -> Modlet {
    let mut schemas = Schemas::new();
    schemas.push(Schema::new(system_id).with_public_id(public_id));
    Modlet::new(name, model).with_schemas(schemas)
}

fn registry_with_fixed(entries: Vec<(&'static str, Modlet)>) -> ImplementationRegistry {
    let mut registry = ImplementationRegistry::with_defaults();
    for (name, modlet) in entries {
        registry.register_provider_with(name, move |_| {
            Ok(Box::new(FixedProvider {
                modlet: modlet.clone(),
            }))
        });
    }
    registry
}

#[test]
fn test_single_provider_yields_seed_plus_contribution() {
    modlet_test_utils::init_tracing();
    let workspace = Workspace::new();
    workspace.write_provider_list("ModletProvider", &["x-provider"]);

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry_with_fixed(vec![(
            "x-provider",
            schema_modlet("X", "urn:m", "P", "S"),
        )]))
        .build();

    let modlets = context.modlets().unwrap();
    assert_eq!(modlets.len(), 2);
    assert!(modlets.get("modlet").is_some(), "self-describing seed");
    assert!(modlets.get("X").is_some());

    let report = context.validate_modlets(&modlets).unwrap();
    assert!(report.is_valid());
}

#[test]
fn test_conflicting_providers_invalidate_aggregate() {
    let workspace = Workspace::new();
    workspace.write_provider_list("ModletProvider", &["first", "second"]);

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry_with_fixed(vec![
            ("first", schema_modlet("first-modlet", "urn:m", "P", "S1")),
            ("second", schema_modlet("second-modlet", "urn:m", "P", "S2")),
        ]))
        .build();

    let report = match context.modlets().unwrap_err() {
        Error::InvalidModlets { report } => report,
        other => panic!("expected InvalidModlets, got {other}"),
    };
    let conflicts = report.diagnostics("schema-public-id-conflict");
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].message.contains("first-modlet"));
    assert!(conflicts[0].message.contains("second-modlet"));

    // The failed aggregate was not cached; a second call reruns and fails
    // the same way.
    assert!(matches!(
        context.modlets().unwrap_err(),
        Error::InvalidModlets { .. }
    ));
}

#[test]
fn test_pipeline_idempotent_without_processors() {
    let workspace = Workspace::new();
    workspace.write_provider_list("ModletProvider", &["x-provider"]);

    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry_with_fixed(vec![(
            "x-provider",
            schema_modlet("X", "urn:m", "P", "S"),
        )]))
        .build();

    let aggregate = context.modlets().unwrap();

    // No transformation programs exist, so Process reports "no change".
    assert!(context.process_modlets(&aggregate).unwrap().is_none());

    // Re-validating the accepted aggregate adds no diagnostics.
    let report = context.validate_modlets(&aggregate).unwrap();
    assert!(report.is_valid());
    assert!(report.is_empty());

    // Recomputing from scratch reproduces the same aggregate.
    context.clear_cache();
    let recomputed = context.modlets().unwrap();
    assert_eq!(*aggregate, *recomputed);
}

#[test]
fn test_transform_program_rewrites_aggregate() {
    let workspace = Workspace::new();
    workspace.write_document(
        "x.toml",
        "[[modlet]]\nname = \"X\"\nmodel = \"urn:m\"\n",
    );
    workspace.write_transform(
        "rename.toml",
        concat!(
            "[[op]]\nkind = \"rename-modlet\"\nfrom = \"X\"\nto = \"Y\"\n",
            "[[op]]\nkind = \"set-vendor\"\nvendor = \"acme\"\nmodel = \"urn:m\"\n",
        ),
    );

    let context = ModelContext::builder().locator(workspace.search_path()).build();
    let modlets = context.modlets().unwrap();

    assert!(modlets.get("X").is_none());
    let renamed = modlets.get("Y").unwrap();
    assert_eq!(renamed.vendor.as_deref(), Some("acme"));
    // The seed modlet is outside urn:m and keeps its vendor.
    assert_eq!(modlets.get("modlet").unwrap().vendor, None);
}

#[test]
fn test_chained_transform_programs_feed_each_other() {
    let workspace = Workspace::new();
    workspace.write_document("x.toml", "[[modlet]]\nname = \"X\"\nmodel = \"urn:m\"\n");
    // Programs run in file-name order: first rename X -> Y, then Y -> Z.
    workspace.write_transform(
        "a-first.toml",
        "[[op]]\nkind = \"rename-modlet\"\nfrom = \"X\"\nto = \"Y\"\n",
    );
    workspace.write_transform(
        "b-second.toml",
        "[[op]]\nkind = \"rename-modlet\"\nfrom = \"Y\"\nto = \"Z\"\n",
    );

    let context = ModelContext::builder().locator(workspace.search_path()).build();
    let modlets = context.modlets().unwrap();

    assert!(modlets.get("Z").is_some());
    assert!(modlets.get("X").is_none());
    assert!(modlets.get("Y").is_none());
}

#[test]
fn test_disabled_processor_stage_is_noop() {
    let workspace = Workspace::new();
    workspace.write_document("x.toml", "[[modlet]]\nname = \"X\"\nmodel = \"urn:m\"\n");
    workspace.write_transform(
        "rename.toml",
        "[[op]]\nkind = \"rename-modlet\"\nfrom = \"X\"\nto = \"Y\"\n",
    );

    let context = ModelContext::builder().locator(workspace.search_path()).build();
    context.set_flag_attribute(modlet_context::processor::ENABLED_ATTRIBUTE, false);

    let modlets = context.modlets().unwrap();
    assert!(modlets.get("X").is_some(), "transform must not run");
    assert!(modlets.get("Y").is_none());

    let report = context.validate_modlets(&modlets).unwrap();
    assert!(report.is_valid());
    assert!(report.is_empty(), "a skipped stage adds no diagnostics");
}

/// A service object instantiated from an aggregate service declaration.
#[derive(Debug, Default)]
struct EchoService {
    greeting: Option<String>,
}

impl Configurable for EchoService {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::<Self>::new().writable("greeting", PropertyKind::Text, |s, v| {
            s.greeting = v.and_then(PropertyValue::into_text);
        })
    }
}

#[test]
fn test_service_object_created_from_aggregate_declaration() {
    let workspace = Workspace::new();
    workspace.write_document(
        "svc.toml",
        concat!(
            "[[modlet]]\nname = \"svc\"\nmodel = \"urn:m\"\n",
            "[[modlet.service]]\nidentifier = \"urn:m:echo\"\nimplementation = \"echo-impl\"\n",
            "[[modlet.service.property]]\nname = \"greeting\"\nvalue = \"hello\"\n",
        ),
    );

    let mut registry = ImplementationRegistry::with_defaults();
    registry.register_service_object::<EchoService>("echo-impl");
    let context = ModelContext::builder()
        .locator(workspace.search_path())
        .registry(registry)
        .build();

    let services = context.services_for("urn:m", "urn:m:echo").unwrap();
    assert_eq!(services.len(), 1);

    let object = context.create_service_object(&services[0]).unwrap();
    let echo = object.downcast_ref::<EchoService>().unwrap();
    assert_eq!(echo.greeting.as_deref(), Some("hello"));
}

#[test]
fn test_services_resolved_in_ordinal_order() {
    let workspace = Workspace::new();
    workspace.write_document(
        "svc.toml",
        concat!(
            "[[modlet]]\nname = \"svc\"\nmodel = \"urn:m\"\n",
            "[[modlet.service]]\nidentifier = \"urn:m:cap\"\nimplementation = \"late\"\nordinal = 10\n",
            "[[modlet.service]]\nidentifier = \"urn:m:cap\"\nimplementation = \"early\"\nordinal = 1\n",
            "[[modlet.service]]\nidentifier = \"urn:m:cap\"\nimplementation = \"tied\"\nordinal = 10\n",
        ),
    );

    let context = ModelContext::builder().locator(workspace.search_path()).build();
    let services: Vec<Service> = context.services_for("urn:m", "urn:m:cap").unwrap();
    let names: Vec<&str> = services.iter().map(|s| s.implementation.as_str()).collect();
    assert_eq!(names, vec!["early", "late", "tied"]);
}
