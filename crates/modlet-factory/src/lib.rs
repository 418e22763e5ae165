//! Service object instantiation and property binding.
//!
//! Given a [`modlet_model::Service`] descriptor, this crate produces a
//! live, configured instance: the implementation declares its properties in
//! a closed [`PropertyTable`] and the binder coerces each textual value to
//! the declared kind before invoking the setter.

pub mod binder;
pub mod error;
pub mod factory;

pub use binder::{
    Configurable, PropertyKind, PropertySpec, PropertyTable, PropertyValue, Setter,
    bind_properties,
};
pub use error::{Error, Result};
pub use factory::create_configured;
