//! Session state for the REPL.
//!
//! A [`Session`] binds a finalized [`ModuleRegistry`] to a live
//! [`EngineState`] and a [`TurnScheduler`], and owns the one piece of policy
//! the core leaves to its embedder: what to do when a mutation reports an
//! inconsistent world. The session's answer is to halt — once a handler
//! surfaces the inconsistent-state marker, every later command and turn is
//! refused until a fresh session is built.

use fable_engine::{
    EngineState, SchedulerState, TraceBuffer, TraceEvent, TurnReport, TurnScheduler,
    invoke_handler,
};
use fable_foundation::{Command, Error, HandlerResult, Result, UpdateResult};
use fable_registry::ModuleRegistry;
use fable_world::World;

/// An interactive session over a finalized registry and a world.
#[derive(Debug)]
pub struct Session {
    /// The finalized module registry driving dispatch.
    registry: ModuleRegistry,

    /// World, trace, and dice state.
    state: EngineState,

    /// Turn-phase scheduler.
    scheduler: TurnScheduler,

    /// Set when an inconsistent world state was detected. Holds the
    /// message that reported it.
    halted: Option<String>,
}

impl Session {
    /// Creates a session, validating the world's behavior lists against
    /// the registry first.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity names a behavior the registry does
    /// not know, or names a hook where a module is expected.
    pub fn new(registry: ModuleRegistry, world: World) -> Result<Self> {
        registry.validate_world(&world)?;
        Ok(Self {
            registry,
            state: EngineState::new(world),
            scheduler: TurnScheduler::new(),
            halted: None,
        })
    }

    /// Creates a session with a bounded trace buffer of the given capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails validation against the registry.
    pub fn with_trace_capacity(
        registry: ModuleRegistry,
        world: World,
        capacity: usize,
    ) -> Result<Self> {
        registry.validate_world(&world)?;
        Ok(Self {
            registry,
            state: EngineState::with_trace_capacity(world, capacity),
            scheduler: TurnScheduler::new(),
            halted: None,
        })
    }

    /// Dispatches one command through the registry.
    ///
    /// If the outcome carries the inconsistent-state marker, the session
    /// halts: the result is still returned so the player sees what
    /// happened, but every subsequent call is refused.
    ///
    /// # Errors
    ///
    /// Returns [`fable_foundation::ErrorKind::SessionHalted`] once the
    /// session has halted, and propagates module or engine bugs.
    pub fn execute(&mut self, command: &Command) -> Result<HandlerResult> {
        if self.halted.is_some() {
            return Err(Error::session_halted());
        }

        let result = invoke_handler(&self.registry, &mut self.state, command)?;
        if let Some(message) = &result.message {
            if message.contains(UpdateResult::INCONSISTENT_STATE_MARKER) {
                self.state.record(TraceEvent::Halt {
                    reason: message.clone(),
                });
                self.halted = Some(message.clone());
            }
        }
        Ok(result)
    }

    /// Advances the world one turn, running every scheduled phase.
    ///
    /// # Errors
    ///
    /// Returns [`fable_foundation::ErrorKind::SessionHalted`] once the
    /// session has halted, and propagates the first phase failure.
    pub fn run_turn(&mut self) -> Result<TurnReport> {
        if self.halted.is_some() {
            return Err(Error::session_halted());
        }
        self.scheduler.run_turn(&self.registry, &mut self.state)
    }

    /// Returns the registry this session dispatches through.
    #[must_use]
    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Returns the current world state.
    #[must_use]
    pub fn world(&self) -> &World {
        self.state.world()
    }

    /// Returns the trace buffer.
    #[must_use]
    pub fn trace(&self) -> &TraceBuffer {
        self.state.trace()
    }

    /// Returns the scheduler's current state.
    #[must_use]
    pub const fn scheduler_state(&self) -> &SchedulerState {
        self.scheduler.state()
    }

    /// Returns the halt message, if the session has halted.
    #[must_use]
    pub fn halted(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    /// Returns true once an inconsistent world state has been detected.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted.is_some()
    }
}

// =================================================================
// Tests
// =================================================================
