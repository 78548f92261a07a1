//! Built-in demonstration content for the CLI.
//!
//! The binary needs something to play. This module ships a small study
//! with a few objects and four modules that exercise the core end to end:
//! a base action set, a weight-limit reaction, a clock phase, and an
//! overlay that overrides `take` and delegates back to the base handler.

use fable_foundation::{
    Changes, Command, EntityId, EventResult, HandlerResult, Result, Value,
};
use fable_registry::{
    Accessor, EventContext, HookDefinition, Module, ModuleRegistry, OriginClass, RegistryBuilder,
    VerbEntry,
};
use fable_world::{Entity, World};

/// Builds the demo registry: three base modules and one overlay.
///
/// # Errors
///
/// Returns an error if registration or finalization fails, which would be
/// a bug in the demo content itself.
pub fn registry() -> Result<ModuleRegistry> {
    RegistryBuilder::new()
        .register(actions_module())?
        .register(weight_module())?
        .register(clock_module())?
        .register(house_module())?
        .finalize()
}

/// Builds the demo world: a study containing a player and a few objects.
#[must_use]
pub fn world(seed: u64) -> World {
    World::new()
        .with_seed(seed)
        .insert(
            Entity::new("study").with_property(
                "description",
                "A small study lined with bookshelves. A tall case clock ticks in the corner.",
            ),
        )
        .insert(
            Entity::new("player")
                .with_property("location", "study")
                .with_property("capacity", 10_i64),
        )
        .insert(
            Entity::new("lamp")
                .with_property("name", "brass lamp")
                .with_property("description", "A battered brass lamp, unlit.")
                .with_property("portable", true)
                .with_property("weight", 4_i64)
                .with_property("location", "study")
                .with_behavior("core.weight"),
        )
        .insert(
            Entity::new("watch")
                .with_property("name", "pocket watch")
                .with_property("description", "A silver pocket watch, five minutes slow.")
                .with_property("portable", true)
                .with_property("weight", 1_i64)
                .with_property("location", "study")
                .with_behavior("core.weight"),
        )
        .insert(
            Entity::new("anvil")
                .with_property("name", "iron anvil")
                .with_property("description", "An iron anvil. It looks absurdly heavy.")
                .with_property("portable", true)
                .with_property("weight", 50_i64)
                .with_property("location", "study")
                .with_behavior("core.weight"),
        )
        .insert(
            Entity::new("clock")
                .with_property("name", "case clock")
                .with_property("description", "A tall case clock with a swinging brass pendulum.")
                .with_property("minutes", 0_i64)
                .with_property("location", "study"),
        )
}

// =================================================================
// Modules
// =================================================================

fn actions_module() -> Module {
    Module::build("core.actions", OriginClass::Base)
        .with_verb(
            VerbEntry::new("take")
                .with_synonym("get")
                .with_event("on_take")
                .with_object_required(),
        )
        .with_verb(
            VerbEntry::new("drop")
                .with_event("on_drop")
                .with_object_required(),
        )
        .with_verb(VerbEntry::new("look").with_synonym("l"))
        .with_handler("take", take_handler)
        .with_handler("drop", drop_handler)
        .with_handler("look", look_handler)
        .finish()
}

fn weight_module() -> Module {
    Module::build("core.weight", OriginClass::Base)
        .with_reaction("on_take", weight_limit_reaction)
        .finish()
}

fn clock_module() -> Module {
    Module::build("core.clock", OriginClass::Base)
        .with_turn_phase(HookDefinition::turn_phase("turn_tick"), clock_phase)
        .finish()
}

fn house_module() -> Module {
    Module::build("house.rules", OriginClass::Overlay)
        .with_handler("take", polite_take_handler)
        .finish()
}

// =================================================================
// Handlers
// =================================================================

fn take_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let Some(target) = command.object.clone() else {
        return Ok(HandlerResult::missing_target(&command.verb));
    };
    let Some(entity) = accessor.entity(target.as_str()) else {
        return Ok(HandlerResult::failure("You see no such thing."));
    };
    if entity.property("portable") != Some(&Value::Bool(true)) {
        return Ok(HandlerResult::failure(format!(
            "The {} stays where it is.",
            noun(&entity)
        )));
    }
    if entity.property("carried") == Some(&Value::Bool(true)) {
        return Ok(HandlerResult::failure(format!(
            "You already have the {}.",
            noun(&entity)
        )));
    }

    let changes = Changes::new()
        .with("carried", true)?
        .with("location", "player")?;
    let update = accessor.update(&target, &changes, None)?;
    if update.success {
        let mut result =
            HandlerResult::success().with_message(format!("You take the {}.", noun(&entity)));
        result.data = result.data.union(&update.data);
        Ok(result)
    } else {
        Ok(HandlerResult {
            success: false,
            message: update.message,
            data: update.data,
        })
    }
}

fn drop_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let Some(target) = command.object.clone() else {
        return Ok(HandlerResult::missing_target(&command.verb));
    };
    let Some(entity) = accessor.entity(target.as_str()) else {
        return Ok(HandlerResult::failure("You see no such thing."));
    };
    if entity.property("carried") != Some(&Value::Bool(true)) {
        return Ok(HandlerResult::failure(format!(
            "You aren't carrying the {}.",
            noun(&entity)
        )));
    }

    let here = actor_location(accessor, command);
    let changes = Changes::new()
        .with("carried", false)?
        .with("location", here.as_str())?;
    let update = accessor.update(&target, &changes, None)?;
    if update.success {
        let mut result =
            HandlerResult::success().with_message(format!("You drop the {}.", noun(&entity)));
        result.data = result.data.union(&update.data);
        Ok(result)
    } else {
        Ok(HandlerResult {
            success: false,
            message: update.message,
            data: update.data,
        })
    }
}

fn look_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let target = match command.object.clone() {
        Some(object) => object,
        None => EntityId::new(actor_location(accessor, command)),
    };
    let Some(entity) = accessor.entity(target.as_str()) else {
        return Ok(HandlerResult::failure("You see no such thing."));
    };
    let message = match entity.property("description") {
        Some(Value::String(text)) => text.to_string(),
        _ => format!("You see nothing special about the {}.", noun(&entity)),
    };
    Ok(HandlerResult::success().with_message(message))
}

/// Overlay take handler: delegates to the base handler, then narrates.
fn polite_take_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let result = accessor.invoke_previous_handler(command)?;
    if result.success {
        let message = match &result.message {
            Some(text) => format!("{text} The housekeeper dusts the spot where it sat."),
            None => "The housekeeper dusts the spot where it sat.".to_string(),
        };
        Ok(result.with_message(message))
    } else {
        Ok(result)
    }
}

// =================================================================
// Reactions and phases
// =================================================================

/// Vetoes a take that would push the actor past their carrying capacity.
fn weight_limit_reaction(
    entity: &Entity,
    accessor: &mut dyn Accessor,
    context: &EventContext,
) -> Result<EventResult> {
    let Some(Value::Int(weight)) = entity.property("weight") else {
        return Ok(EventResult::allow());
    };
    let capacity = context
        .actor
        .as_ref()
        .and_then(|actor| accessor.entity(actor.as_str()))
        .and_then(|actor| int_property(&actor, "capacity"));
    let Some(capacity) = capacity else {
        return Ok(EventResult::allow());
    };

    let carried: i64 = accessor
        .world()
        .entities()
        .filter(|other| other.property("carried") == Some(&Value::Bool(true)))
        .filter_map(|other| int_property(other, "weight"))
        .sum();

    if carried + weight > capacity {
        Ok(
            EventResult::veto(format!("The {} is too heavy to carry.", noun(entity)))
                .with_data("overweight", carried + weight - capacity),
        )
    } else {
        Ok(EventResult::allow())
    }
}

/// Advances the case clock by one minute each turn.
fn clock_phase(accessor: &mut dyn Accessor) -> Result<()> {
    let Some(clock) = accessor.entity("clock") else {
        return Ok(());
    };
    let minutes = int_property(&clock, "minutes").unwrap_or(0);
    let changes = Changes::new().with("minutes", minutes + 1)?;
    accessor.update(&EntityId::new("clock"), &changes, None)?;
    Ok(())
}

// =================================================================
// Helpers
// =================================================================

fn noun(entity: &Entity) -> String {
    match entity.property("name") {
        Some(Value::String(name)) => name.to_string(),
        _ => entity.id().to_string(),
    }
}

fn int_property(entity: &Entity, key: &str) -> Option<i64> {
    match entity.property(key) {
        Some(Value::Int(value)) => Some(*value),
        _ => None,
    }
}

fn actor_location(accessor: &dyn Accessor, command: &Command) -> String {
    accessor
        .entity(command.actor.as_str())
        .and_then(|actor| match actor.property("location") {
            Some(Value::String(room)) => Some(room.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "study".to_string())
}

// =================================================================
// Tests
// =================================================================
