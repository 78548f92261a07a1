//! The turn scheduler: precomputed phases, run once per turn.
//!
//! Phase ordering is fixed at registry finalize time; the scheduler only
//! walks that order. Each phase runs against a fresh turn-scoped accessor,
//! so phases mutate the world through the same gate handlers use but have
//! no handler chain to delegate into.

use std::fmt;
use std::sync::Arc;

use fable_foundation::{ErrorContext, Result};
use fable_registry::ModuleRegistry;

use crate::accessor::{EngineState, TurnAccessor};
use crate::trace::TraceEvent;

/// Where the scheduler stands in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// The schedule is computed; no turn has run yet.
    Ordered,
    /// A phase is executing, or died executing.
    Running {
        /// The phase in flight.
        phase: Arc<str>,
    },
    /// Between turns, after at least one completed turn.
    Idle,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self::Ordered
    }
}

/// What one completed turn did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// The turn number that just completed.
    pub turn: u64,
    /// How many phases ran.
    pub phases_run: usize,
}

impl fmt::Display for TurnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn {}: {} phases", self.turn, self.phases_run)
    }
}

/// Runs turn phases in their scheduled order.
#[derive(Clone, Debug, Default)]
pub struct TurnScheduler {
    state: SchedulerState,
}

impl TurnScheduler {
    /// Creates a scheduler ready for its first turn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scheduler's lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Advances the world one turn and runs every phase in order.
    ///
    /// On success the scheduler lands in [`SchedulerState::Idle`]. When a
    /// phase fails, the error is returned with the phase named in its
    /// context and the scheduler stays [`SchedulerState::Running`] on the
    /// failed phase.
    ///
    /// # Errors
    ///
    /// Propagates the first phase failure.
    pub fn run_turn(
        &mut self,
        registry: &ModuleRegistry,
        state: &mut EngineState,
    ) -> Result<TurnReport> {
        state.world = state.world.advance_turn();
        let turn = state.world.turn();
        state.record(TraceEvent::TurnStart { turn });

        let mut phases_run = 0;
        for phase in registry.turn_phases() {
            self.state = SchedulerState::Running {
                phase: phase.name().clone(),
            };
            state.record(TraceEvent::Phase {
                name: phase.name().clone(),
                module: phase.module().clone(),
            });
            let mut accessor = TurnAccessor::for_turn(
                registry,
                &mut state.world,
                &mut state.trace,
                &mut state.rng,
            );
            (phase.func())(&mut accessor).map_err(|err| {
                if err.context.is_some() {
                    err
                } else {
                    err.with_context(
                        ErrorContext::new()
                            .with_module(phase.module().to_string())
                            .with_frame(format!("turn phase {}", phase.name())),
                    )
                }
            })?;
            phases_run += 1;
        }

        self.state = SchedulerState::Idle;
        Ok(TurnReport { turn, phases_run })
    }
}
