//! The Fable engine: dispatch, gated mutation, and the turn scheduler.
//!
//! This crate executes what the registry describes. [`invoke_handler`]
//! canonicalizes a command and runs the active handler with a delegation
//! stack; the [`fable_registry::Accessor`] implementation here routes
//! `update` calls through the reaction gate and path mutations; and
//! [`TurnScheduler`] walks the precomputed turn-phase order. Everything an
//! execution does lands in the [`TraceBuffer`] for inspection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accessor;
mod behavior;
pub mod dispatch;
mod mutate;
pub mod schedule;
pub mod trace;

pub use accessor::{EngineState, TurnAccessor};
pub use dispatch::invoke_handler;
pub use schedule::{SchedulerState, TurnReport, TurnScheduler};
pub use trace::{DEFAULT_TRACE_CAPACITY, TraceBuffer, TraceEvent};
