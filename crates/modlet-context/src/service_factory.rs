//! The built-in service factory.

use crate::context::ModelContext;
use crate::registry::{ServiceFactory, ServiceObject};
use crate::Result;
use modlet_factory::{Configurable, PropertyKind, PropertyTable, PropertyValue};
use modlet_model::Service;

/// Resolves `Service.implementation` names against the registry's
/// service-object table and binds the declared properties.
#[derive(Debug, Clone, Default)]
pub struct DefaultServiceFactory {
    ordinal: Option<i32>,
}

impl DefaultServiceFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceFactory for DefaultServiceFactory {
    fn create_service_object(
        &self,
        context: &ModelContext,
        service: &Service,
    ) -> Result<Option<ServiceObject>> {
        match context
            .registry()
            .new_service_object(&service.implementation, service)
        {
            Some(result) => Ok(Some(result?)),
            None => {
                // A name registered under a stage capability is a wiring
                // mistake, not an unknown implementation.
                if context.registry().knows_any(&service.implementation) {
                    return Err(modlet_factory::Error::IllegalService {
                        name: service.implementation.clone(),
                    }
                    .into());
                }
                Ok(None)
            }
        }
    }

    fn ordinal(&self, _context: &ModelContext) -> i32 {
        self.ordinal.unwrap_or(0)
    }
}

impl Configurable for DefaultServiceFactory {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::<Self>::new().writable("ordinal", PropertyKind::int32(), |f, v| {
            f.ordinal = v.and_then(PropertyValue::into_int).map(|i| i as i32);
        })
    }
}
