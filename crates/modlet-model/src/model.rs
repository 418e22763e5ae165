//! The composite model being assembled.

use std::any::Any;
use std::sync::Arc;

/// The model under construction: an identifier plus an open bag of
/// arbitrary typed payloads.
///
/// The payload bag is opaque to the pipeline; providers and callers use it
/// to carry the actual content being assembled. Lookup returns the first
/// payload of the requested type.
#[derive(Clone, Default)]
pub struct Model {
    identifier: String,
    payloads: Vec<Arc<dyn Any + Send + Sync>>,
}

impl Model {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            payloads: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn add<T: Any + Send + Sync>(&mut self, payload: T) {
        self.payloads.push(Arc::new(payload));
    }

    /// First payload of type `T`, if any.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payloads.iter().find_map(|p| p.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn clear(&mut self) {
        self.payloads.clear();
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("identifier", &self.identifier)
            .field("payloads", &self.payloads.len())
            .finish()
    }
}
