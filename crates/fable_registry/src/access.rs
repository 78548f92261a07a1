//! The capability surface handed to module code.
//!
//! Handlers, reactions, and turn-phase functions never touch the world
//! directly; they receive an [`Accessor`] scoped to the current command or
//! turn. The engine crate provides the implementation; declaring the trait
//! here lets modules be pure registration data with plain function pointers.

use std::sync::Arc;

use fable_foundation::{
    Changes, Command, EntityId, EventResult, HandlerResult, Result, UpdateResult,
};
use fable_world::{Entity, World};

/// Context passed to a reaction alongside the reacting entity.
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The event being reacted to.
    pub event: Arc<str>,
    /// The entity that caused the event, if any.
    pub actor: Option<EntityId>,
    /// The mutations awaiting permission.
    pub changes: Changes,
}

impl EventContext {
    /// Creates a context for an event.
    #[must_use]
    pub fn new(event: impl Into<Arc<str>>) -> Self {
        Self {
            event: event.into(),
            actor: None,
            changes: Changes::new(),
        }
    }

    /// Sets the acting entity.
    #[must_use]
    pub fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Sets the pending changes.
    #[must_use]
    pub fn with_changes(mut self, changes: Changes) -> Self {
        self.changes = changes;
        self
    }
}

/// Command- or turn-scoped access to the world.
///
/// One accessor exists per dispatch or per turn; it is created by the engine
/// and dropped when the call finishes, taking any delegation state with it.
pub trait Accessor {
    /// Returns the world as it currently stands within this call.
    fn world(&self) -> &World;

    /// Looks up an entity by id, returning a cheap clone.
    fn entity(&self, id: &str) -> Option<Entity>;

    /// Looks up an entity, erroring when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`fable_foundation::ErrorKind::EntityNotFound`] for unknown ids.
    fn require_entity(&self, id: &EntityId) -> Result<Entity>;

    /// Returns the entity the current command acts for, if any.
    fn actor(&self) -> Option<&EntityId>;

    /// Applies a behavior-gated update to the target entity.
    ///
    /// When `event` is `None`, the event mapped from the dispatched verb (if
    /// any) gates the update; with no applicable event the mutations proceed
    /// ungated. Vetoes and mutation failures come back inside the
    /// [`UpdateResult`], never as `Err`.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for internal bugs, such as a reaction function
    /// failing or the target entity vanishing mid-update.
    fn update(
        &mut self,
        target: &EntityId,
        changes: &Changes,
        event: Option<&str>,
    ) -> Result<UpdateResult>;

    /// Invokes the handler one position older in the current chain.
    ///
    /// The delegated handler runs with this same accessor, may itself
    /// delegate further, and its result comes back to the caller, which may
    /// adjust it before returning.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the delegated handler itself fails with an
    /// internal error.
    ///
    /// # Panics
    ///
    /// Panics when called outside handler dispatch (a turn-phase function
    /// has no chain to delegate into) and when the current handler is
    /// already the oldest in the chain. Both are contract violations in the
    /// calling module, not gameplay outcomes.
    fn invoke_previous_handler(&mut self, command: &Command) -> Result<HandlerResult>;

    /// Rolls a die with the given number of sides, returning 1..=sides.
    ///
    /// Draws come from the session's deterministic stream; a session with
    /// the same seed, content, and commands rolls the same numbers.
    fn roll(&mut self, sides: u32) -> u32;
}

/// A command handler: receives the accessor and the command, returns the
/// gameplay outcome.
pub type HandlerFn = fn(&mut dyn Accessor, &Command) -> Result<HandlerResult>;

/// An entity reaction: receives the reacting entity, the accessor, and the
/// event context.
pub type ReactionFn = fn(&Entity, &mut dyn Accessor, &EventContext) -> Result<EventResult>;

/// A turn-phase function: receives the accessor, mutates through it.
pub type PhaseFn = fn(&mut dyn Accessor) -> Result<()>;
