//! The context attribute bag.
//!
//! Attributes are a side channel shared between callers and stage
//! implementations: callers use them to override component configuration,
//! providers use them to record instantiated singletons. A value is never
//! absent-but-present; storing requires a value, and absence is observable
//! through `get` returning `None`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// An attribute value. Arbitrary payloads are allowed; typed helpers exist
/// for the common flag/text/ordinal override shapes.
pub type AttributeValue = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct Attributes {
    map: HashMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.map.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        self.map.get(key).cloned()
    }

    /// Remove an attribute, reporting whether it was present.
    pub fn clear(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.map
            .get(key)
            .and_then(|v| v.downcast_ref::<String>())
            .cloned()
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(|v| v.downcast_ref::<bool>()).copied()
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.map.get(key).and_then(|v| v.downcast_ref::<i32>()).copied()
    }
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort();
        f.debug_struct("Attributes").field("keys", &keys).finish()
    }
}
