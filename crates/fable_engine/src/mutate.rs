//! Behavior-gated updates: reactions vote, then mutations apply in order.
//!
//! An update names a target entity, a change set, and optionally an event.
//! When an event applies (passed explicitly, or mapped from the dispatched
//! verb), the target's reactions vote first and a veto aborts the update
//! with the world untouched. Once mutations start applying there is no
//! rollback: a failure after the first success commits what applied and
//! returns a result carrying the inconsistent-state marker.

use std::sync::Arc;

use fable_foundation::{
    Changes, EntityId, EventResult, Result, UpdateResult, apply_mutation,
};
use fable_registry::{Accessor, EventContext};

use crate::accessor::TurnAccessor;
use crate::behavior::combine_reactions;
use crate::trace::TraceEvent;

pub(crate) fn apply_update(
    accessor: &mut TurnAccessor<'_>,
    target: &EntityId,
    changes: &Changes,
    event: Option<&str>,
) -> Result<UpdateResult> {
    // An explicit event wins; otherwise the dispatched verb's event gates.
    let gate: Option<Arc<str>> = event
        .map(Arc::from)
        .or_else(|| accessor.verb_event().cloned());

    let mut payload: Option<EventResult> = None;
    if let Some(event) = gate {
        let entity = accessor.require_entity(target)?;
        let mut context = EventContext::new(event).with_changes(changes.clone());
        if let Some(actor) = accessor.actor() {
            context = context.with_actor(actor.clone());
        }
        if let Some(combined) = combine_reactions(accessor, &entity, &context)? {
            accessor.record(TraceEvent::Gate {
                event: context.event.clone(),
                target: target.clone(),
                allowed: combined.allowed,
            });
            if !combined.allowed {
                let message = combined
                    .message
                    .unwrap_or_else(|| "Something prevents it.".to_string());
                return Ok(UpdateResult::failure(message).with_merged_data(&combined.data));
            }
            payload = Some(combined);
        }
    }

    if changes.is_empty() {
        return Ok(finish(UpdateResult::success(), payload));
    }

    let mut properties = accessor.require_entity(target)?.properties().clone();
    let total = changes.len();
    let mut applied = 0usize;
    for (path, value) in changes.iter() {
        match apply_mutation(&properties, path, value) {
            Ok(next) => {
                properties = next;
                applied += 1;
                accessor.record(TraceEvent::Mutation {
                    target: target.clone(),
                    path: path.to_string(),
                    applied: true,
                });
            }
            Err(err) => {
                accessor.record(TraceEvent::Mutation {
                    target: target.clone(),
                    path: path.to_string(),
                    applied: false,
                });
                if applied == 0 {
                    // Nothing committed; the world is still consistent.
                    return Ok(finish(UpdateResult::failure(err.to_string()), payload));
                }
                // Earlier mutations stay committed; there is no rollback.
                accessor.set_entity_properties(target, properties)?;
                return Ok(UpdateResult::inconsistent(format!(
                    "{applied} of {total} changes applied to {target} before {path} failed: {err}"
                )));
            }
        }
    }
    accessor.set_entity_properties(target, properties)?;
    Ok(finish(UpdateResult::success(), payload))
}

/// Folds the reaction payload into the final result. Data always merges;
/// the reaction message fills in only when the result has none of its own.
fn finish(mut result: UpdateResult, payload: Option<EventResult>) -> UpdateResult {
    if let Some(payload) = payload {
        if result.message.is_none() {
            if let Some(message) = payload.message {
                result = result.with_message(message);
            }
        }
        result = result.with_merged_data(&payload.data);
    }
    result
}
