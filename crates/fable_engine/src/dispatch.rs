//! Command dispatch through handler override chains.
//!
//! Dispatch canonicalizes the command's verb through the merged vocabulary,
//! applies the stock refusals (unknown verb, missing required object), and
//! invokes the active handler, which is the newest entry in the verb's
//! chain. The handler runs against a fresh [`TurnAccessor`] whose
//! delegation stack starts at the active position, so
//! `invoke_previous_handler` walks toward older handlers from there.

use fable_foundation::{Command, Error, HandlerResult, Result};
use fable_registry::ModuleRegistry;

use crate::accessor::{EngineState, TurnAccessor};
use crate::trace::TraceEvent;

/// Dispatches one command and returns the gameplay outcome.
///
/// Refusals (unknown verb, missing object, no handler) are `Ok` results
/// with `success` false; `Err` means a module or engine bug.
///
/// # Errors
///
/// Propagates handler failures that are errors rather than outcomes.
pub fn invoke_handler(
    registry: &ModuleRegistry,
    state: &mut EngineState,
    command: &Command,
) -> Result<HandlerResult> {
    state.record(TraceEvent::Command {
        verb: command.verb.clone(),
        actor: command.actor.clone(),
        object: command.object.clone(),
    });

    let Some(entry) = registry.vocabulary().resolve(&command.verb) else {
        return Ok(HandlerResult::unknown_verb(&command.verb));
    };
    if entry.object_required() && command.object.is_none() {
        return Ok(HandlerResult::missing_target(&command.verb));
    }

    let canonical = entry.word().clone();
    let default_event = entry.event().cloned();
    let Some(chain) = registry.handler_chain(&canonical) else {
        return Ok(
            HandlerResult::failure(format!("Nothing knows how to {canonical:?}."))
                .with_data("reason", "no-handler")
                .with_data("verb", &*canonical),
        );
    };
    let Some(active) = chain.last() else {
        return Err(Error::internal(format!(
            "empty handler chain for {canonical:?}"
        )));
    };
    state.record(TraceEvent::Handler {
        verb: canonical.clone(),
        module: active.module().clone(),
    });

    let func = active.func();
    let mut accessor = TurnAccessor::for_command(
        registry,
        &mut state.world,
        &mut state.trace,
        &mut state.rng,
        command.actor.clone(),
        canonical,
        chain,
        default_event,
    );
    func(&mut accessor, command)
}
