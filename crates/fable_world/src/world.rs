//! Immutable world state with structural sharing.

use fable_foundation::{EntityId, Error, FbMap, PropMap, Result};

use crate::entity::Entity;

/// The complete game state at one moment.
///
/// Worlds are immutable: every mutator returns a new `World` sharing
/// structure with the old one, so cloning and keeping old worlds is O(1).
/// The seed pins down every random draw a session will ever make; the turn
/// counter advances once per scheduler run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    entities: FbMap<EntityId, Entity>,
    seed: u64,
    turn: u64,
}

impl World {
    /// Creates an empty world with seed 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: FbMap::new(),
            seed: 0,
            turn: 0,
        }
    }

    /// Returns a copy with the given seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the current turn number.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Returns a copy with the turn counter advanced by one.
    #[must_use]
    pub fn advance_turn(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            seed: self.seed,
            turn: self.turn + 1,
        }
    }

    /// Returns a copy with the entity inserted, replacing any same-id entity.
    #[must_use]
    pub fn insert(&self, entity: Entity) -> Self {
        Self {
            entities: self.entities.insert(entity.id().clone(), entity),
            seed: self.seed,
            turn: self.turn,
        }
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Looks up an entity, erroring when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`fable_foundation::ErrorKind::EntityNotFound`] for unknown ids.
    pub fn require_entity(&self, id: &EntityId) -> Result<&Entity> {
        self.entities
            .get(id.as_str())
            .ok_or_else(|| Error::entity_not_found(id.clone()))
    }

    /// Returns true if an entity with the id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the world holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates all entities in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Returns a copy with one entity's property map replaced.
    ///
    /// This is the raw write the gated update pipeline commits through; game
    /// code goes through an accessor instead.
    ///
    /// # Errors
    ///
    /// Returns [`fable_foundation::ErrorKind::EntityNotFound`] for unknown ids.
    pub fn with_entity_properties(&self, id: &EntityId, properties: PropMap) -> Result<Self> {
        let entity = self.require_entity(id)?.clone();
        Ok(self.insert(entity.with_properties(properties)))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
