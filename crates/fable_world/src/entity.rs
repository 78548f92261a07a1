//! Entities: identity, properties, behaviors.

use std::sync::Arc;

use fable_foundation::{EntityId, FbVec, PropMap, Value, read_path};

/// A thing in the world.
///
/// An entity is its id, a property map, and an ordered list of behavior
/// module names. Order matters: reactions combine in behaviors-list order.
/// Entities are immutable; the `with_*` methods return modified copies that
/// share structure with the original.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    id: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    properties: PropMap,
    #[cfg_attr(feature = "serde", serde(default))]
    behaviors: FbVec<Arc<str>>,
}

impl Entity {
    /// Creates an entity with no properties and no behaviors.
    #[must_use]
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            properties: PropMap::new(),
            behaviors: FbVec::new(),
        }
    }

    /// Returns the entity's id.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the property map.
    #[must_use]
    pub const fn properties(&self) -> &PropMap {
        &self.properties
    }

    /// Returns the behavior module names, in reaction order.
    #[must_use]
    pub const fn behaviors(&self) -> &FbVec<Arc<str>> {
        &self.behaviors
    }

    /// Looks up a top-level property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Looks up a property at a dotted path.
    #[must_use]
    pub fn property_path(&self, path: &str) -> Option<&Value> {
        read_path(&self.properties, path)
    }

    /// Returns true if the behaviors list names the module.
    #[must_use]
    pub fn has_behavior(&self, module: &str) -> bool {
        self.behaviors.iter().any(|name| &**name == module)
    }

    /// Returns a copy with one property set.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.properties = self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with the whole property map replaced.
    #[must_use]
    pub fn with_properties(mut self, properties: PropMap) -> Self {
        self.properties = properties;
        self
    }

    /// Returns a copy with one property removed.
    #[must_use]
    pub fn without_property(mut self, key: &str) -> Self {
        self.properties = self.properties.remove(key);
        self
    }

    /// Returns a copy with a behavior module appended.
    #[must_use]
    pub fn with_behavior(mut self, module: impl Into<Arc<str>>) -> Self {
        self.behaviors = self.behaviors.push_back(module.into());
        self
    }
}
