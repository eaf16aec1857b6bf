//! Element behavior registry.
//!
//! Maps a pattern's subtype name to the [`BlockBehavior`] attached to
//! elements of that subtype. The registry is an explicit instance built
//! during mode initialization and passed by reference to the engine; there is
//! no process-wide registration state.
//!
//! Resolution is deliberately soft: an unregistered subtype degrades to a
//! generic behavior with a warning, never a failure, because an unfamiliar
//! block must not abort segmentation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::elements::{spacer, unknown_block, BlockBehavior, UNKNOWN_SUBTYPE};
use crate::error::ConfigurationError;

#[derive(Default, Clone)]
pub struct ElementRegistry {
    behaviors: HashMap<String, Arc<dyn BlockBehavior>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        ElementRegistry::default()
    }

    /// A registry pre-seeded with the shared `Spacer` and fallback
    /// unknown-block behaviors every mode wants.
    pub fn with_base() -> Self {
        let mut registry = ElementRegistry::new();
        registry.register_or_replace("Spacer", spacer());
        registry.register_or_replace(UNKNOWN_SUBTYPE, unknown_block());
        registry
    }

    /// Register a behavior for `subtype`, strictly.
    ///
    /// Used for first-time registration of built-in subtypes; registering a
    /// name twice is a configuration bug.
    pub fn register(
        &mut self,
        subtype: impl Into<String>,
        behavior: Arc<dyn BlockBehavior>,
    ) -> Result<(), ConfigurationError> {
        let subtype = subtype.into();
        if self.behaviors.contains_key(&subtype) {
            return Err(ConfigurationError::DuplicateSubtype(subtype));
        }
        self.behaviors.insert(subtype, behavior);
        Ok(())
    }

    /// Register a behavior for `subtype`, silently overwriting any existing
    /// one. Used when a mode overrides shared base behavior.
    pub fn register_or_replace(
        &mut self,
        subtype: impl Into<String>,
        behavior: Arc<dyn BlockBehavior>,
    ) {
        self.behaviors.insert(subtype.into(), behavior);
    }

    /// Look up the behavior for `subtype`.
    pub fn resolve(&self, subtype: &str) -> Option<Arc<dyn BlockBehavior>> {
        self.behaviors.get(subtype).cloned()
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.behaviors.keys().collect();
        names.sort();
        f.debug_struct("ElementRegistry").field("subtypes", &names).finish()
    }
}
