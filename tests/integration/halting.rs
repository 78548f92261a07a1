//! Session halting on inconsistent world state.
//!
//! There is no rollback, so when a change set fails partway through the
//! committed prefix stays in the world and the update reports the
//! inconsistent-state marker. The session's job is to notice the marker,
//! halt, and refuse everything afterwards while the wreckage stays
//! inspectable.

use fable_engine::TraceEvent;
use fable_foundation::{
    Changes, Command, ErrorKind, EventResult, HandlerResult, Result, UpdateResult, Value,
};
use fable_registry::{
    Accessor, EventContext, HookDefinition, Module, ModuleRegistry, OriginClass, RegistryBuilder,
    VerbEntry,
};
use fable_runtime::Session;
use fable_world::{Entity, World};

fn as_outcome(update: UpdateResult) -> HandlerResult {
    HandlerResult {
        success: update.success,
        message: update.message,
        data: update.data,
    }
}

fn invoke_handler_fn(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let target = command.object.clone().expect("invoke requires an object");
    // The second change removes from a list the idol never had.
    let changes = Changes::new()
        .with("power", 9)?
        .with("-wards", "seal")?;
    Ok(as_outcome(accessor.update(&target, &changes, None)?))
}

fn crack_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let target = command.object.clone().expect("crack requires an object");
    let changes = Changes::new()
        .with("-wards", "seal")?
        .with("power", 9)?;
    Ok(as_outcome(accessor.update(&target, &changes, None)?))
}

fn bless_handler(accessor: &mut dyn Accessor, command: &Command) -> Result<HandlerResult> {
    let target = command.object.clone().expect("bless requires an object");
    let changes = Changes::new().with("power", 1)?;
    Ok(as_outcome(accessor.update(&target, &changes, None)?))
}

fn wave_handler(_: &mut dyn Accessor, _: &Command) -> Result<HandlerResult> {
    Ok(HandlerResult::success().with_message("You wave."))
}

fn seal_holds(
    _entity: &Entity,
    _accessor: &mut dyn Accessor,
    _context: &EventContext,
) -> Result<EventResult> {
    Ok(EventResult::veto("The seal holds."))
}

fn hum_phase(_: &mut dyn Accessor) -> Result<()> {
    Ok(())
}

fn ritual_registry() -> ModuleRegistry {
    RegistryBuilder::new()
        .register(
            Module::build("core.ritual", OriginClass::Base)
                .with_verb(VerbEntry::new("invoke").with_object_required())
                .with_verb(VerbEntry::new("crack").with_object_required())
                .with_verb(VerbEntry::new("bless").with_event("on_bless").with_object_required())
                .with_verb(VerbEntry::new("wave"))
                .with_handler("invoke", invoke_handler_fn)
                .with_handler("crack", crack_handler)
                .with_handler("bless", bless_handler)
                .with_handler("wave", wave_handler)
                .with_turn_phase(HookDefinition::turn_phase("turn_hum"), hum_phase)
                .finish(),
        )
        .unwrap()
        .register(
            Module::build("ward.seal", OriginClass::Base)
                .with_reaction("on_bless", seal_holds)
                .finish(),
        )
        .unwrap()
        .finalize()
        .unwrap()
}

fn ritual_world() -> World {
    World::new()
        .insert(Entity::new("player"))
        .insert(Entity::new("idol"))
        .insert(Entity::new("tomb").with_behavior("ward.seal"))
}

fn ritual_session() -> Session {
    Session::new(ritual_registry(), ritual_world()).unwrap()
}

// =============================================================================
// Halting
// =============================================================================

#[test]
fn a_partial_update_halts_the_session() {
    let mut session = ritual_session();
    let result = session
        .execute(&Command::new("invoke", "player").with_object("idol"))
        .unwrap();

    assert!(!result.success);
    let message = result.message.as_deref().unwrap();
    assert!(message.starts_with(UpdateResult::INCONSISTENT_STATE_MARKER));

    assert!(session.is_halted());
    assert!(
        session
            .halted()
            .unwrap()
            .contains("1 of 2 changes applied to idol")
    );

    let last = session.trace().iter().last().unwrap();
    assert!(matches!(last, TraceEvent::Halt { .. }));
    assert!(last.to_string().starts_with("halt: [inconsistent-state]"));
}

#[test]
fn a_halted_session_refuses_but_stays_inspectable() {
    let mut session = ritual_session();
    session
        .execute(&Command::new("invoke", "player").with_object("idol"))
        .unwrap();

    let err = session.execute(&Command::new("wave", "player")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SessionHalted));
    assert!(err.to_string().contains("session halted"));

    let err = session.run_turn().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SessionHalted));

    // The committed prefix stays visible for post-mortem inspection.
    let idol = session.world().entity("idol").unwrap();
    assert_eq!(idol.property("power"), Some(&Value::Int(9)));
    assert!(idol.property("wards").is_none());
}

// =============================================================================
// What does not halt
// =============================================================================

#[test]
fn clean_failures_do_not_halt() {
    let mut session = ritual_session();
    let result = session
        .execute(&Command::new("crack", "player").with_object("idol"))
        .unwrap();

    // The first change failed, so nothing committed and nothing marks.
    assert!(!result.success);
    assert!(
        !result
            .message
            .as_deref()
            .unwrap()
            .starts_with(UpdateResult::INCONSISTENT_STATE_MARKER)
    );
    assert!(!session.is_halted());
    assert!(session.world().entity("idol").unwrap().property("power").is_none());

    let result = session.execute(&Command::new("wave", "player")).unwrap();
    assert!(result.success);
}

#[test]
fn vetoed_updates_do_not_halt() {
    let mut session = ritual_session();
    let result = session
        .execute(&Command::new("bless", "player").with_object("tomb"))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("The seal holds."));
    assert!(!session.is_halted());
    assert!(session.run_turn().is_ok());
}
