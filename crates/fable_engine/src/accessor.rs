//! Engine state and the accessor handed to module code.
//!
//! [`EngineState`] owns everything mutable in a session: the world, the
//! trace buffer, and the deterministic random stream. [`TurnAccessor`] is
//! the short-lived view the engine builds over that state for one dispatch
//! or one turn phase; it implements the [`Accessor`] trait module functions
//! are written against, and carries the delegation stack that makes
//! `invoke_previous_handler` reentrant.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use fable_foundation::{Changes, Command, EntityId, HandlerResult, PropMap, Result, UpdateResult};
use fable_registry::{Accessor, HandlerEntry, ModuleRegistry};
use fable_world::{Entity, World};

use crate::mutate;
use crate::trace::{DEFAULT_TRACE_CAPACITY, TraceBuffer, TraceEvent};

// =============================================================================
// Engine State
// =============================================================================

/// Per-session mutable state threaded through dispatch and turns.
///
/// The registry stays outside: it is immutable once finalized and shared by
/// reference. The random stream is seeded once from the world seed and
/// advances monotonically, so a session replays identically from the same
/// seed, content, and command sequence.
#[derive(Clone, Debug)]
pub struct EngineState {
    pub(crate) world: World,
    pub(crate) trace: TraceBuffer,
    pub(crate) rng: ChaCha8Rng,
}

impl EngineState {
    /// Creates state around a world with the default trace capacity.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self::with_trace_capacity(world, DEFAULT_TRACE_CAPACITY)
    }

    /// Creates state around a world with an explicit trace capacity.
    #[must_use]
    pub fn with_trace_capacity(world: World, capacity: usize) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(world.seed());
        Self {
            world,
            trace: TraceBuffer::new(capacity),
            rng,
        }
    }

    /// Returns the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the trace buffer.
    #[must_use]
    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Appends an event to the trace buffer.
    pub fn record(&mut self, event: TraceEvent) {
        self.trace.push(event);
    }
}

// =============================================================================
// Turn Accessor
// =============================================================================

/// How far down the chain the current dispatch has delegated.
#[derive(Debug)]
struct DelegationState<'a> {
    verb: Arc<str>,
    chain: &'a [HandlerEntry],
    stack: Vec<usize>,
}

/// The [`Accessor`] implementation for one dispatch or one turn phase.
///
/// Created by the engine, dropped when the call finishes. Command-scoped
/// accessors carry the handler chain and a delegation stack; turn-scoped
/// accessors have neither, so delegating from a turn phase is a contract
/// violation and panics.
#[derive(Debug)]
pub struct TurnAccessor<'a> {
    registry: &'a ModuleRegistry,
    world: &'a mut World,
    trace: &'a mut TraceBuffer,
    rng: &'a mut ChaCha8Rng,
    actor: Option<EntityId>,
    default_event: Option<Arc<str>>,
    delegation: Option<DelegationState<'a>>,
}

impl<'a> TurnAccessor<'a> {
    /// Builds a command-scoped accessor with its delegation stack at the
    /// active handler.
    pub(crate) fn for_command(
        registry: &'a ModuleRegistry,
        world: &'a mut World,
        trace: &'a mut TraceBuffer,
        rng: &'a mut ChaCha8Rng,
        actor: EntityId,
        verb: Arc<str>,
        chain: &'a [HandlerEntry],
        default_event: Option<Arc<str>>,
    ) -> Self {
        Self {
            registry,
            world,
            trace,
            rng,
            actor: Some(actor),
            default_event,
            delegation: Some(DelegationState {
                verb,
                chain,
                stack: vec![0],
            }),
        }
    }

    /// Builds a turn-scoped accessor with no actor and no chain.
    pub(crate) fn for_turn(
        registry: &'a ModuleRegistry,
        world: &'a mut World,
        trace: &'a mut TraceBuffer,
        rng: &'a mut ChaCha8Rng,
    ) -> Self {
        Self {
            registry,
            world,
            trace,
            rng,
            actor: None,
            default_event: None,
            delegation: None,
        }
    }

    /// Returns the registry with the full borrow lifetime, so callers can
    /// hold it across further `&mut self` use.
    pub(crate) fn registry(&self) -> &'a ModuleRegistry {
        self.registry
    }

    /// Returns the event the dispatched verb maps to, if any.
    pub(crate) fn verb_event(&self) -> Option<&Arc<str>> {
        self.default_event.as_ref()
    }

    /// Appends an event to the trace buffer.
    pub(crate) fn record(&mut self, event: TraceEvent) {
        self.trace.push(event);
    }

    /// Replaces an entity's properties in the world.
    pub(crate) fn set_entity_properties(
        &mut self,
        id: &EntityId,
        properties: PropMap,
    ) -> Result<()> {
        *self.world = self.world.with_entity_properties(id, properties)?;
        Ok(())
    }
}

impl Accessor for TurnAccessor<'_> {
    fn world(&self) -> &World {
        self.world
    }

    fn entity(&self, id: &str) -> Option<Entity> {
        self.world.entity(id).cloned()
    }

    fn require_entity(&self, id: &EntityId) -> Result<Entity> {
        self.world.require_entity(id).cloned()
    }

    fn actor(&self) -> Option<&EntityId> {
        self.actor.as_ref()
    }

    fn update(
        &mut self,
        target: &EntityId,
        changes: &Changes,
        event: Option<&str>,
    ) -> Result<UpdateResult> {
        mutate::apply_update(self, target, changes, event)
    }

    fn invoke_previous_handler(&mut self, command: &Command) -> Result<HandlerResult> {
        let (func, module, verb, position) = {
            let Some(state) = self.delegation.as_mut() else {
                panic!("invoke_previous_handler called outside handler dispatch");
            };
            let current = *state
                .stack
                .last()
                .expect("delegation stack never empties during dispatch");
            let position = current + 1;
            assert!(
                position < state.chain.len(),
                "handler delegated past the oldest handler in the {:?} chain",
                state.verb
            );
            state.stack.push(position);
            let entry = &state.chain[state.chain.len() - 1 - position];
            (
                entry.func(),
                entry.module().clone(),
                state.verb.clone(),
                position,
            )
        };
        self.record(TraceEvent::Delegation {
            verb,
            module,
            position,
        });
        let result = func(self, command);
        if let Some(state) = self.delegation.as_mut() {
            state.stack.pop();
        }
        result
    }

    fn roll(&mut self, sides: u32) -> u32 {
        assert!(sides > 0, "roll requires a die with at least one side");
        self.rng.gen_range(1..=sides)
    }
}
