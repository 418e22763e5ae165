//! Configured-instance creation from service descriptors.

use crate::binder::{Configurable, bind_properties};
use crate::Result;
use modlet_model::Service;

/// Instantiate `T` and bind every property declared by `service`.
///
/// This is the single path through which discovered stage implementations
/// and registry-resolved service objects come to life: default-construct,
/// then apply the declarative configuration.
pub fn create_configured<T: Configurable + Default>(service: &Service) -> Result<T> {
    let mut instance = T::default();
    bind_properties(&mut instance, &service.implementation, &service.properties)?;
    tracing::trace!(
        implementation = %service.implementation,
        identifier = %service.identifier,
        properties = service.properties.len(),
        "created service object"
    );
    Ok(instance)
}
