//! Execution tracing.
//!
//! Dispatch, reactions, mutations, and turn phases append [`TraceEvent`]s to
//! a bounded [`TraceBuffer`]; the runtime renders recent events on demand.
//! Records carry real identifiers rather than preformatted strings so tools
//! can filter on them.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use fable_foundation::EntityId;

/// Default number of events a trace buffer retains.
pub const DEFAULT_TRACE_CAPACITY: usize = 10_000;

// =============================================================================
// Trace Event
// =============================================================================

/// One step of engine execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A command entered dispatch.
    Command {
        /// The surface verb as typed.
        verb: Arc<str>,
        /// The acting entity.
        actor: EntityId,
        /// The target entity, if any.
        object: Option<EntityId>,
    },
    /// The active handler took a verb.
    Handler {
        /// The canonical verb.
        verb: Arc<str>,
        /// The module whose handler ran.
        module: Arc<str>,
    },
    /// A handler delegated to the one beneath it in the chain.
    Delegation {
        /// The canonical verb.
        verb: Arc<str>,
        /// The module delegated to.
        module: Arc<str>,
        /// Depth below the active handler, starting at 1.
        position: usize,
    },
    /// A reaction voted on an event.
    Reaction {
        /// The reacting behavior module.
        module: Arc<str>,
        /// The event reacted to.
        event: Arc<str>,
        /// Whether the reaction allowed the event.
        allowed: bool,
    },
    /// A gated update passed or failed its reaction walk.
    Gate {
        /// The gating event.
        event: Arc<str>,
        /// The entity being updated.
        target: EntityId,
        /// Whether the combined reactions allowed the update.
        allowed: bool,
    },
    /// One mutation applied or failed.
    Mutation {
        /// The entity being updated.
        target: EntityId,
        /// The mutation path, in its written form.
        path: String,
        /// Whether the mutation applied.
        applied: bool,
    },
    /// A turn began.
    TurnStart {
        /// The new turn number.
        turn: u64,
    },
    /// A turn phase ran.
    Phase {
        /// The phase hook name.
        name: Arc<str>,
        /// The module whose definition won.
        module: Arc<str>,
    },
    /// The session halted.
    Halt {
        /// Why the session stopped accepting commands.
        reason: String,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command {
                verb,
                actor,
                object,
            } => {
                write!(f, "command {verb} by {actor}")?;
                if let Some(object) = object {
                    write!(f, " on {object}")?;
                }
                Ok(())
            }
            Self::Handler { verb, module } => write!(f, "handler {module} takes {verb}"),
            Self::Delegation {
                verb,
                module,
                position,
            } => write!(f, "delegate {verb} to {module} (depth {position})"),
            Self::Reaction {
                module,
                event,
                allowed,
            } => write!(
                f,
                "reaction {module} {event} -> {}",
                if *allowed { "allow" } else { "veto" }
            ),
            Self::Gate {
                event,
                target,
                allowed,
            } => write!(
                f,
                "gate {event} on {target} -> {}",
                if *allowed { "open" } else { "shut" }
            ),
            Self::Mutation {
                target,
                path,
                applied,
            } => write!(
                f,
                "mutate {target} {path} -> {}",
                if *applied { "ok" } else { "failed" }
            ),
            Self::TurnStart { turn } => write!(f, "turn {turn}"),
            Self::Phase { name, module } => write!(f, "phase {name} ({module})"),
            Self::Halt { reason } => write!(f, "halt: {reason}"),
        }
    }
}

// =============================================================================
// Trace Buffer
// =============================================================================

/// A bounded ring of trace events, oldest evicted first.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    events: VecDeque<TraceEvent>,
    capacity: usize,
}

impl TraceBuffer {
    /// Creates a buffer retaining at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Appends an event, evicting the oldest when full.
    pub fn push(&mut self, event: TraceEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Returns the number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the retention limit.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates retained events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    /// Iterates the most recent `count` events, oldest of those first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &TraceEvent> {
        let skip = self.events.len().saturating_sub(count);
        self.events.iter().skip(skip)
    }

    /// Discards all retained events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}
