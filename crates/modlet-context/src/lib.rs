//! Model context and aggregation pipeline.
//!
//! The [`ModelContext`] is the entry point of the framework: it discovers
//! modlet contributions on a search path, orders and merges them, runs
//! them through transformation programs and validates the result, handing
//! callers a cached aggregate. Stage implementations are resolved by name
//! through the [`ImplementationRegistry`], honoring the platform override
//! file ahead of packaged provider lists.

pub mod attributes;
pub mod conflict;
pub mod context;
pub mod defaults;
pub mod error;
pub mod processor;
pub mod provider;
pub mod registry;
pub mod service_factory;
pub mod validator;

pub use attributes::{AttributeValue, Attributes};
pub use context::{Listener, ModelContext, ModelContextBuilder, SchemaIndex};
pub use defaults::Defaults;
pub use error::{Error, Result};
pub use processor::DefaultModletProcessor;
pub use provider::DefaultModletProvider;
pub use registry::{
    Capability, DEFAULT_IMPLEMENTATION_NAME, ImplementationRegistry, ModletProcessor,
    ModletProvider, ModletValidator, ServiceFactory, ServiceObject,
};
pub use service_factory::DefaultServiceFactory;
pub use validator::DefaultModletValidator;
