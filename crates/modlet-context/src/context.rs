//! The model context: attribute bag, listener fan-out, and the cached
//! Find → Process → Validate pipeline.
//!
//! A context owns the cached aggregate exclusively. The aggregate is
//! computed at most once per cache generation: concurrent callers
//! serialize on the cache mutex, and an invalid validation outcome leaves
//! the cache empty. Stage implementations receive the context by reference
//! and must not call [`ModelContext::modlets`] reentrantly.

use crate::attributes::{AttributeValue, Attributes};
use crate::defaults::Defaults;
use crate::registry::{
    Capability, DEFAULT_IMPLEMENTATION_NAME, ImplementationRegistry, ModletProcessor,
    ModletProvider, ModletValidator, ServiceFactory, ServiceObject,
};
use crate::{Error, Result};
use modlet_binding::{DocumentBinding, TomlBinding};
use modlet_discovery::{PlatformOverrides, ProviderLoader, ResourceLocator, SearchPath};
use modlet_model::{
    MODEL_PUBLIC_ID, MODEL_SYSTEM_ID, Modlet, Modlets, Schema, Schemas, Service, Severity,
    ValidationReport,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Receives context log events that pass the severity gate.
pub trait Listener: Send + Sync {
    fn on_log(&self, severity: Severity, message: &str);
}

/// Index of every schema in the aggregate, supporting exact system-id
/// lookup with a deterministic suffix fallback.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    entries: Vec<Schema>,
}

impl SchemaIndex {
    fn build(modlets: &Modlets) -> Self {
        let mut entries: Vec<Schema> = modlets
            .iter()
            .filter_map(|m| m.schemas.as_ref())
            .flat_map(|s| s.iter().cloned())
            .collect();
        entries.sort_by(|a, b| a.system_id.cmp(&b.system_id));
        entries.dedup();
        Self { entries }
    }

    /// Exact system-id match first, then the first entry (in system-id
    /// order) whose system id ends with `system_id`.
    pub fn find(&self, system_id: &str) -> Option<&Schema> {
        self.entries
            .iter()
            .find(|s| s.system_id == system_id)
            .or_else(|| self.entries.iter().find(|s| s.system_id.ends_with(system_id)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`ModelContext`].
#[derive(Default)]
pub struct ModelContextBuilder {
    defaults: Option<Defaults>,
    locator: Option<Arc<dyn ResourceLocator>>,
    search_roots: Vec<PathBuf>,
    binding: Option<Arc<dyn DocumentBinding>>,
    registry: Option<ImplementationRegistry>,
}

impl ModelContextBuilder {
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Use a custom locator instead of a [`SearchPath`] over
    /// [`search_root`](Self::search_root)s.
    pub fn locator(mut self, locator: impl ResourceLocator + 'static) -> Self {
        self.locator = Some(Arc::new(locator));
        self
    }

    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn binding(mut self, binding: impl DocumentBinding + 'static) -> Self {
        self.binding = Some(Arc::new(binding));
        self
    }

    pub fn registry(mut self, registry: ImplementationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> ModelContext {
        let defaults = self.defaults.unwrap_or_default();
        let locator = self.locator.unwrap_or_else(|| {
            let mut search_path = SearchPath::new(self.search_roots);
            if let Some(path) = &defaults.platform_overrides {
                search_path = search_path.with_platform_overrides(path);
            }
            Arc::new(search_path)
        });
        ModelContext {
            defaults,
            locator,
            binding: self.binding.unwrap_or_else(|| Arc::new(TomlBinding::new())),
            registry: Arc::new(self.registry.unwrap_or_else(ImplementationRegistry::with_defaults)),
            attributes: Mutex::new(Attributes::new()),
            listeners: Mutex::new(Vec::new()),
            modlets_cache: Mutex::new(None),
            schema_index: Mutex::new(None),
        }
    }
}

/// The process-wide entry point of the framework.
pub struct ModelContext {
    defaults: Defaults,
    locator: Arc<dyn ResourceLocator>,
    binding: Arc<dyn DocumentBinding>,
    registry: Arc<ImplementationRegistry>,
    attributes: Mutex<Attributes>,
    listeners: Mutex<Vec<Arc<dyn Listener>>>,
    modlets_cache: Mutex<Option<Arc<Modlets>>>,
    schema_index: Mutex<Option<Arc<SchemaIndex>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ModelContext {
    pub fn builder() -> ModelContextBuilder {
        ModelContextBuilder::default()
    }

    /// A context over the given search roots with every default in place.
    pub fn new(search_roots: Vec<PathBuf>) -> Self {
        let mut builder = Self::builder();
        for root in search_roots {
            builder = builder.search_root(root);
        }
        builder.build()
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn locator(&self) -> &dyn ResourceLocator {
        self.locator.as_ref()
    }

    pub fn binding(&self) -> &dyn DocumentBinding {
        self.binding.as_ref()
    }

    pub fn registry(&self) -> &ImplementationRegistry {
        &self.registry
    }

    // ----- attributes -------------------------------------------------

    pub fn set_attribute(&self, key: impl Into<String>, value: AttributeValue) {
        lock(&self.attributes).set(key, value);
    }

    pub fn set_text_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.set_attribute(key, Arc::new(value.into()));
    }

    pub fn set_flag_attribute(&self, key: impl Into<String>, value: bool) {
        self.set_attribute(key, Arc::new(value));
    }

    pub fn set_int_attribute(&self, key: impl Into<String>, value: i32) {
        self.set_attribute(key, Arc::new(value));
    }

    pub fn attribute(&self, key: &str) -> Option<AttributeValue> {
        lock(&self.attributes).get(key)
    }

    pub fn text_attribute(&self, key: &str) -> Option<String> {
        lock(&self.attributes).text(key)
    }

    pub fn flag_attribute(&self, key: &str) -> Option<bool> {
        lock(&self.attributes).flag(key)
    }

    pub fn int_attribute(&self, key: &str) -> Option<i32> {
        lock(&self.attributes).int(key)
    }

    pub fn clear_attribute(&self, key: &str) -> bool {
        lock(&self.attributes).clear(key)
    }

    // ----- logging ----------------------------------------------------

    pub fn add_listener(&self, listener: Arc<dyn Listener>) {
        lock(&self.listeners).push(listener);
    }

    pub fn is_loggable(&self, severity: Severity) -> bool {
        severity >= self.defaults.log_level
    }

    /// Fan a log event out to every listener, mirroring it to `tracing`.
    /// Events below the severity gate are dropped.
    pub fn log(&self, severity: Severity, message: &str) {
        if !self.is_loggable(severity) {
            return;
        }
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error | Severity::Fatal => tracing::error!("{message}"),
        }
        for listener in lock(&self.listeners).iter() {
            listener.on_log(severity, message);
        }
    }

    // ----- capability discovery ---------------------------------------

    fn platform_overrides(&self) -> Result<PlatformOverrides> {
        match self.locator.find_platform_overrides()? {
            Some(resource) => {
                let text = resource.read_to_string()?;
                Ok(PlatformOverrides::parse(&text, &resource.path)?)
            }
            None => Ok(PlatformOverrides::empty()),
        }
    }

    fn discover<T>(
        &self,
        capability: Capability,
        instantiate: impl Fn(
            &ImplementationRegistry,
            &str,
            &Service,
        ) -> Option<modlet_factory::Result<T>>,
    ) -> Result<Vec<T>> {
        let overrides = self.platform_overrides()?;
        let loader = ProviderLoader::new(self.defaults.provider_location.clone());
        let discovered = loader.load(
            capability.type_name(),
            self.locator.as_ref(),
            &overrides,
            |name| self.registry.classify(capability, name),
        )?;

        let names: Vec<String> = if discovered.is_empty() {
            // Nothing registered on the search path; fall back to the
            // built-in default when the registry carries one.
            if self
                .registry
                .classify(capability, DEFAULT_IMPLEMENTATION_NAME)
                == modlet_discovery::NameStatus::Known
            {
                tracing::debug!(
                    capability = capability.type_name(),
                    "no implementations discovered, using built-in default"
                );
                vec![DEFAULT_IMPLEMENTATION_NAME.to_string()]
            } else {
                Vec::new()
            }
        } else {
            discovered.into_iter().map(|d| d.name).collect()
        };

        let mut instances = Vec::with_capacity(names.len());
        for name in names {
            let service = Service::new(capability.type_name(), &name);
            match instantiate(&self.registry, &name, &service) {
                Some(result) => instances.push(result?),
                None => {
                    return Err(modlet_factory::Error::ServiceNotFound { name }.into());
                }
            }
        }
        Ok(instances)
    }

    /// The discovered Find providers, sorted stably by ordinal.
    pub fn providers(&self) -> Result<Vec<Box<dyn ModletProvider>>> {
        let mut providers =
            self.discover(Capability::Provider, |r, name, service| r.new_provider(name, service))?;
        providers.sort_by_key(|p| p.ordinal(self));
        Ok(providers)
    }

    /// The discovered processors, sorted stably by ordinal.
    pub fn processors(&self) -> Result<Vec<Box<dyn ModletProcessor>>> {
        let mut processors = self
            .discover(Capability::Processor, |r, name, service| r.new_processor(name, service))?;
        processors.sort_by_key(|p| p.ordinal(self));
        Ok(processors)
    }

    /// The discovered validators, sorted stably by ordinal.
    pub fn validators(&self) -> Result<Vec<Box<dyn ModletValidator>>> {
        let mut validators = self
            .discover(Capability::Validator, |r, name, service| r.new_validator(name, service))?;
        validators.sort_by_key(|v| v.ordinal(self));
        Ok(validators)
    }

    /// The discovered service factories, sorted stably by ordinal.
    pub fn service_factories(&self) -> Result<Vec<Box<dyn ServiceFactory>>> {
        let mut factories =
            self.discover(Capability::Factory, |r, name, service| r.new_factory(name, service))?;
        factories.sort_by_key(|f| f.ordinal(self));
        Ok(factories)
    }

    // ----- pipeline ---------------------------------------------------

    /// The modlet describing this context's own schema, seeding every Find
    /// pass.
    pub fn seed_modlet() -> Modlet {
        let mut schemas = Schemas::new();
        schemas.push(Schema::new(MODEL_SYSTEM_ID).with_public_id(MODEL_PUBLIC_ID));
        Modlet::new("modlet", MODEL_PUBLIC_ID)
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schemas(schemas)
    }

    /// Run the Find stage: every provider in ordinal order, each receiving
    /// the accumulator so far. A provider returning `None` leaves the
    /// accumulator untouched.
    pub fn find_modlets(&self) -> Result<Modlets> {
        let mut accumulator = Modlets::new();
        accumulator.push(Self::seed_modlet());
        for provider in self.providers()? {
            if let Some(next) = provider.find_modlets(self, &accumulator)? {
                accumulator = next;
            }
        }
        Ok(accumulator)
    }

    /// Run the Process stage, threading each processor's output into the
    /// next. Returns `None` when no processor changed anything.
    pub fn process_modlets(&self, modlets: &Modlets) -> Result<Option<Modlets>> {
        let mut current: Option<Modlets> = None;
        for processor in self.processors()? {
            let input = current.as_ref().unwrap_or(modlets);
            if let Some(next) = processor.process_modlets(self, input)? {
                current = Some(next);
            }
        }
        Ok(current)
    }

    /// Run the Validate stage, merging every validator's report.
    pub fn validate_modlets(&self, modlets: &Modlets) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        for validator in self.validators()? {
            if let Some(partial) = validator.validate_modlets(self, modlets)? {
                report.merge(partial);
            }
        }
        Ok(report)
    }

    /// The current aggregate, computing it on first use.
    ///
    /// The full pipeline runs under the cache lock, so the aggregate is
    /// built at most once per cache generation even with concurrent
    /// callers. A failing validation leaves the cache empty and raises
    /// [`Error::InvalidModlets`] after logging every diagnostic; a
    /// half-valid aggregate is never returned.
    pub fn modlets(&self) -> Result<Arc<Modlets>> {
        let mut cache = lock(&self.modlets_cache);
        if let Some(cached) = cache.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let found = self.find_modlets()?;
        let modlets = match self.process_modlets(&found)? {
            Some(processed) => processed,
            None => found,
        };
        let report = self.validate_modlets(&modlets)?;
        for diagnostic in report.details() {
            self.log(diagnostic.severity, &diagnostic.message);
        }
        if !report.is_valid() {
            return Err(Error::InvalidModlets { report });
        }

        let aggregate = Arc::new(modlets);
        *cache = Some(Arc::clone(&aggregate));
        Ok(aggregate)
    }

    /// Drop the cached aggregate and the schema index.
    pub fn clear_cache(&self) {
        *lock(&self.modlets_cache) = None;
        *lock(&self.schema_index) = None;
        tracing::debug!("modlet cache cleared");
    }

    // ----- aggregate queries ------------------------------------------

    /// Create the service object described by `service`, asking each
    /// discovered factory in order; the first one claiming the
    /// implementation wins.
    pub fn create_service_object(&self, service: &Service) -> Result<ServiceObject> {
        for factory in self.service_factories()? {
            if let Some(object) = factory.create_service_object(self, service)? {
                return Ok(object);
            }
        }
        Err(modlet_factory::Error::ServiceNotFound {
            name: service.implementation.clone(),
        }
        .into())
    }

    /// Merged schemas of `model`; a model without any registered schema is
    /// an error.
    pub fn merged_schemas(&self, model: &str) -> Result<Schemas> {
        self.modlets()?
            .merged_schemas(model)
            .ok_or_else(|| Error::MissingSchemas {
                model: model.to_string(),
            })
    }

    /// Services registered under `identifier` for `model`, in ordinal
    /// order.
    pub fn services_for(&self, model: &str, identifier: &str) -> Result<Vec<Service>> {
        let modlets = self.modlets()?;
        Ok(modlets
            .services_for(model, identifier)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Look up a schema by system id, with suffix fallback, through the
    /// get-or-compute index over the current aggregate.
    pub fn find_schema(&self, system_id: &str) -> Result<Option<Schema>> {
        let index = self.schema_index()?;
        Ok(index.find(system_id).cloned())
    }

    fn schema_index(&self) -> Result<Arc<SchemaIndex>> {
        if let Some(index) = lock(&self.schema_index).as_ref() {
            return Ok(Arc::clone(index));
        }
        // Computed outside the index lock; modlets() takes the cache lock.
        let modlets = self.modlets()?;
        let index = Arc::new(SchemaIndex::build(&modlets));
        let mut slot = lock(&self.schema_index);
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("defaults", &self.defaults)
            .field("registry", &self.registry)
            .field("cached", &lock(&self.modlets_cache).is_some())
            .finish()
    }
}
