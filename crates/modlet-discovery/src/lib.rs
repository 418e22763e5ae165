//! Resource location and provider discovery for the modlet framework.
//!
//! This crate resolves symbolic locations against an ordered search path
//! ([`SearchPath`]), parses the platform override file
//! ([`PlatformOverrides`]), and turns both into ordered implementation
//! lists per capability type ([`ProviderLoader`]).

pub mod error;
pub mod loader;
pub mod locator;
pub mod platform;

pub use error::{Error, Result};
pub use loader::{DiscoveredImplementation, NameStatus, ProviderLoader};
pub use locator::{Resource, ResourceLocator, SearchPath};
pub use platform::PlatformOverrides;
