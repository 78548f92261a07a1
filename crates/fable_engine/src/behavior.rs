//! Reaction walks: how an entity's behaviors vote on an event.
//!
//! The walk visits the entity's behavior modules in list order and calls
//! each module's reaction for the event, if it registered one. Results
//! combine by AND: the first veto stops the walk, messages join with
//! newlines through the veto, and data merges shallowly with later modules
//! winning on key collisions.

use fable_foundation::{EventResult, PropMap, Result};
use fable_registry::EventContext;
use fable_world::Entity;

use crate::accessor::TurnAccessor;
use crate::trace::TraceEvent;

/// Runs the entity's reactions for one event and combines their votes.
///
/// Returns `Ok(None)` when no behavior module registered a reaction for the
/// event, which callers treat as "nothing to consult".
pub(crate) fn combine_reactions(
    accessor: &mut TurnAccessor<'_>,
    entity: &Entity,
    context: &EventContext,
) -> Result<Option<EventResult>> {
    let registry = accessor.registry();

    let mut saw_reaction = false;
    let mut allowed = true;
    let mut messages: Vec<String> = Vec::new();
    let mut data = PropMap::new();

    for module in entity.behaviors().iter() {
        let Some(func) = registry.reaction(module, &context.event) else {
            continue;
        };
        let result = func(entity, accessor, context)?;
        accessor.record(TraceEvent::Reaction {
            module: module.clone(),
            event: context.event.clone(),
            allowed: result.allowed,
        });

        saw_reaction = true;
        if let Some(message) = result.message {
            messages.push(message);
        }
        data = data.union(&result.data);
        if !result.allowed {
            allowed = false;
            break;
        }
    }

    if !saw_reaction {
        return Ok(None);
    }
    let message = if messages.is_empty() {
        None
    } else {
        Some(messages.join("\n"))
    };
    Ok(Some(EventResult {
        allowed,
        message,
        data,
    }))
}
