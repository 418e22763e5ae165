//! Capability traits and the implementation registry.
//!
//! The four capability types of the framework are abstractions over
//! "accept the current aggregate, return a replacement or no change".
//! Concrete implementations are registered by name; the provider loader
//! resolves names discovered on the search path or in the platform
//! override file against this registry at configuration time.

use crate::context::ModelContext;
use crate::provider::DefaultModletProvider;
use crate::processor::DefaultModletProcessor;
use crate::service_factory::DefaultServiceFactory;
use crate::validator::DefaultModletValidator;
use crate::Result;
use modlet_discovery::NameStatus;
use modlet_factory::{Configurable, create_configured};
use modlet_model::{Modlets, Service, ValidationReport};
use std::any::Any;
use std::collections::HashMap;

/// A live service object created from a [`Service`] descriptor.
pub type ServiceObject = Box<dyn Any + Send + Sync>;

/// Contributes modlets during the Find stage.
///
/// Returning `None` keeps the prior accumulator; returning an empty
/// collection replaces the accumulator with an empty one. The distinction
/// is deliberate and preserved throughout the pipeline.
pub trait ModletProvider: Send + Sync {
    fn find_modlets(&self, context: &ModelContext, current: &Modlets) -> Result<Option<Modlets>>;

    /// Sort key among providers, resolved against the context so callers
    /// can override it through an attribute. Lower ordinals run first;
    /// equal ordinals keep discovery order.
    fn ordinal(&self, _context: &ModelContext) -> i32 {
        0
    }
}

/// Rewrites the aggregate during the Process stage.
pub trait ModletProcessor: Send + Sync {
    fn process_modlets(&self, context: &ModelContext, modlets: &Modlets)
    -> Result<Option<Modlets>>;

    fn ordinal(&self, _context: &ModelContext) -> i32 {
        0
    }
}

/// Checks the aggregate during the Validate stage.
pub trait ModletValidator: Send + Sync {
    fn validate_modlets(
        &self,
        context: &ModelContext,
        modlets: &Modlets,
    ) -> Result<Option<ValidationReport>>;

    fn ordinal(&self, _context: &ModelContext) -> i32 {
        0
    }
}

/// Creates live service objects from service descriptors.
///
/// Returning `None` means "this factory does not handle the
/// implementation"; the context then asks the next discovered factory.
pub trait ServiceFactory: Send + Sync {
    fn create_service_object(
        &self,
        context: &ModelContext,
        service: &Service,
    ) -> Result<Option<ServiceObject>>;

    fn ordinal(&self, _context: &ModelContext) -> i32 {
        0
    }
}

/// The four capability types implementations can fulfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Provider,
    Processor,
    Validator,
    Factory,
}

impl Capability {
    /// The capability type name used in provider-list resource names and
    /// platform override keys.
    pub fn type_name(&self) -> &'static str {
        match self {
            Capability::Provider => "ModletProvider",
            Capability::Processor => "ModletProcessor",
            Capability::Validator => "ModletValidator",
            Capability::Factory => "ServiceFactory",
        }
    }
}

type Constructor<T> = Box<dyn Fn(&Service) -> modlet_factory::Result<T> + Send + Sync>;

/// Name-keyed registry of implementation constructors per capability, plus
/// a table of service-object implementations resolvable through
/// [`ServiceFactory`] instances.
#[derive(Default)]
pub struct ImplementationRegistry {
    providers: HashMap<String, Constructor<Box<dyn ModletProvider>>>,
    processors: HashMap<String, Constructor<Box<dyn ModletProcessor>>>,
    validators: HashMap<String, Constructor<Box<dyn ModletValidator>>>,
    factories: HashMap<String, Constructor<Box<dyn ServiceFactory>>>,
    service_objects: HashMap<String, Constructor<ServiceObject>>,
}

impl ImplementationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in default implementation of every
    /// capability registered under [`DEFAULT_IMPLEMENTATION_NAME`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_provider::<DefaultModletProvider>(DEFAULT_IMPLEMENTATION_NAME);
        registry.register_processor::<DefaultModletProcessor>(DEFAULT_IMPLEMENTATION_NAME);
        registry.register_validator::<DefaultModletValidator>(DEFAULT_IMPLEMENTATION_NAME);
        registry.register_factory::<DefaultServiceFactory>(DEFAULT_IMPLEMENTATION_NAME);
        registry
    }

    pub fn register_provider<P>(&mut self, name: impl Into<String>)
    where
        P: ModletProvider + Configurable + Default + 'static,
    {
        self.register_provider_with(name, |service| {
            Ok(Box::new(create_configured::<P>(service)?))
        });
    }

    pub fn register_provider_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Service) -> modlet_factory::Result<Box<dyn ModletProvider>>
        + Send
        + Sync
        + 'static,
    ) {
        self.providers.insert(name.into(), Box::new(constructor));
    }

    pub fn register_processor<P>(&mut self, name: impl Into<String>)
    where
        P: ModletProcessor + Configurable + Default + 'static,
    {
        self.register_processor_with(name, |service| {
            Ok(Box::new(create_configured::<P>(service)?))
        });
    }

    pub fn register_processor_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Service) -> modlet_factory::Result<Box<dyn ModletProcessor>>
        + Send
        + Sync
        + 'static,
    ) {
        self.processors.insert(name.into(), Box::new(constructor));
    }

    pub fn register_validator<V>(&mut self, name: impl Into<String>)
    where
        V: ModletValidator + Configurable + Default + 'static,
    {
        self.register_validator_with(name, |service| {
            Ok(Box::new(create_configured::<V>(service)?))
        });
    }

    pub fn register_validator_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Service) -> modlet_factory::Result<Box<dyn ModletValidator>>
        + Send
        + Sync
        + 'static,
    ) {
        self.validators.insert(name.into(), Box::new(constructor));
    }

    pub fn register_factory<F>(&mut self, name: impl Into<String>)
    where
        F: ServiceFactory + Configurable + Default + 'static,
    {
        self.register_factory_with(name, |service| {
            Ok(Box::new(create_configured::<F>(service)?))
        });
    }

    pub fn register_factory_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Service) -> modlet_factory::Result<Box<dyn ServiceFactory>>
        + Send
        + Sync
        + 'static,
    ) {
        self.factories.insert(name.into(), Box::new(constructor));
    }

    /// Register a service-object implementation resolvable by name through
    /// the default service factory.
    pub fn register_service_object<T>(&mut self, name: impl Into<String>)
    where
        T: Any + Send + Sync + Configurable + Default + 'static,
    {
        self.register_service_object_with(name, |service| {
            Ok(Box::new(create_configured::<T>(service)?) as ServiceObject)
        });
    }

    pub fn register_service_object_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Service) -> modlet_factory::Result<ServiceObject>
        + Send
        + Sync
        + 'static,
    ) {
        self.service_objects.insert(name.into(), Box::new(constructor));
    }

    fn contains(&self, capability: Capability, name: &str) -> bool {
        match capability {
            Capability::Provider => self.providers.contains_key(name),
            Capability::Processor => self.processors.contains_key(name),
            Capability::Validator => self.validators.contains_key(name),
            Capability::Factory => self.factories.contains_key(name),
        }
    }

    /// Classify a discovered name for the loader: registered under the
    /// requested capability, registered elsewhere, or unknown.
    pub fn classify(&self, capability: Capability, name: &str) -> NameStatus {
        if self.contains(capability, name) {
            return NameStatus::Known;
        }
        let elsewhere = [
            Capability::Provider,
            Capability::Processor,
            Capability::Validator,
            Capability::Factory,
        ]
        .into_iter()
        .any(|other| other != capability && self.contains(other, name))
            || self.service_objects.contains_key(name);
        if elsewhere {
            NameStatus::WrongCapability
        } else {
            NameStatus::Unknown
        }
    }

    pub fn new_provider(
        &self,
        name: &str,
        service: &Service,
    ) -> Option<modlet_factory::Result<Box<dyn ModletProvider>>> {
        self.providers.get(name).map(|ctor| ctor(service))
    }

    pub fn new_processor(
        &self,
        name: &str,
        service: &Service,
    ) -> Option<modlet_factory::Result<Box<dyn ModletProcessor>>> {
        self.processors.get(name).map(|ctor| ctor(service))
    }

    pub fn new_validator(
        &self,
        name: &str,
        service: &Service,
    ) -> Option<modlet_factory::Result<Box<dyn ModletValidator>>> {
        self.validators.get(name).map(|ctor| ctor(service))
    }

    pub fn new_factory(
        &self,
        name: &str,
        service: &Service,
    ) -> Option<modlet_factory::Result<Box<dyn ServiceFactory>>> {
        self.factories.get(name).map(|ctor| ctor(service))
    }

    pub fn new_service_object(
        &self,
        name: &str,
        service: &Service,
    ) -> Option<modlet_factory::Result<ServiceObject>> {
        self.service_objects.get(name).map(|ctor| ctor(service))
    }

    /// Whether `name` is registered anywhere: under any capability or as a
    /// service object.
    pub fn knows_any(&self, name: &str) -> bool {
        self.providers.contains_key(name)
            || self.processors.contains_key(name)
            || self.validators.contains_key(name)
            || self.factories.contains_key(name)
            || self.service_objects.contains_key(name)
    }
}

impl std::fmt::Debug for ImplementationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementationRegistry")
            .field("providers", &self.providers.len())
            .field("processors", &self.processors.len())
            .field("validators", &self.validators.len())
            .field("factories", &self.factories.len())
            .field("service_objects", &self.service_objects.len())
            .finish()
    }
}

/// Registry name of the built-in default implementations.
pub const DEFAULT_IMPLEMENTATION_NAME: &str = "default";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_registers_every_capability() {
        let registry = ImplementationRegistry::with_defaults();
        for capability in [
            Capability::Provider,
            Capability::Processor,
            Capability::Validator,
            Capability::Factory,
        ] {
            assert_eq!(
                registry.classify(capability, DEFAULT_IMPLEMENTATION_NAME),
                NameStatus::Known,
                "{capability:?}"
            );
        }
    }

    #[test]
    fn test_classify_unknown() {
        let registry = ImplementationRegistry::new();
        assert_eq!(
            registry.classify(Capability::Provider, "mystery"),
            NameStatus::Unknown
        );
    }

    #[test]
    fn test_classify_wrong_capability() {
        let mut registry = ImplementationRegistry::new();
        registry.register_validator::<DefaultModletValidator>("strict");

        assert_eq!(
            registry.classify(Capability::Validator, "strict"),
            NameStatus::Known
        );
        assert_eq!(
            registry.classify(Capability::Provider, "strict"),
            NameStatus::WrongCapability
        );
    }

    #[test]
    fn test_new_provider_constructs() {
        let registry = ImplementationRegistry::with_defaults();
        let service = Service::new(Capability::Provider.type_name(), DEFAULT_IMPLEMENTATION_NAME);
        assert!(registry
            .new_provider(DEFAULT_IMPLEMENTATION_NAME, &service)
            .unwrap()
            .is_ok());
        assert!(registry.new_provider("missing", &service).is_none());
    }
}
