//! A short play-through of the demo content.
//!
//! These tests drive the shipped demo through a [`Session`] the way the
//! REPL would, checking that overlays, reactions, and turn phases all
//! land in one coherent transcript.

use fable_foundation::{Command, Value};
use fable_runtime::{Session, demo};

fn demo_session() -> Session {
    Session::new(demo::registry().unwrap(), demo::world(1)).unwrap()
}

fn play(session: &mut Session, verb: &str, object: &str) -> (bool, String) {
    let result = session
        .execute(&Command::new(verb, "player").with_object(object))
        .unwrap();
    (result.success, result.message.unwrap_or_default())
}

// =============================================================================
// Carrying things
// =============================================================================

#[test]
fn a_short_game_plays_out() {
    let mut session = demo_session();

    // The watch is light; the overlay narrates over the base handler.
    let (ok, message) = play(&mut session, "take", "watch");
    assert!(ok);
    assert!(message.contains("You take the pocket watch."));
    assert!(message.contains("housekeeper"));

    // Watch (1) plus lamp (4) fits under the capacity of 10.
    let (ok, message) = play(&mut session, "take", "lamp");
    assert!(ok, "unexpected refusal: {message}");

    // The anvil (50) would blow straight past it.
    let (ok, message) = play(&mut session, "take", "anvil");
    assert!(!ok);
    assert!(message.contains("too heavy"));
    assert_eq!(
        session.world().entity("anvil").unwrap().property("carried"),
        None
    );

    // Dropping the lamp frees weight, but nowhere near enough.
    let (ok, _) = play(&mut session, "drop", "lamp");
    assert!(ok);
    let (ok, _) = play(&mut session, "take", "anvil");
    assert!(!ok);

    let lamp = session.world().entity("lamp").unwrap();
    assert_eq!(lamp.property("carried"), Some(&Value::Bool(false)));
    assert_eq!(lamp.property("location"), Some(&Value::from("study")));
}

#[test]
fn the_veto_reports_the_excess_weight() {
    let mut session = demo_session();
    let result = session
        .execute(&Command::new("take", "player").with_object("anvil"))
        .unwrap();
    assert!(!result.success);
    // 50 against a capacity of 10 with empty hands.
    assert_eq!(result.data.get("overweight"), Some(&Value::Int(40)));
}

#[test]
fn dropping_what_you_do_not_carry_refuses() {
    let mut session = demo_session();
    let (ok, message) = play(&mut session, "drop", "lamp");
    assert!(!ok);
    assert!(message.contains("aren't carrying"));
}

// =============================================================================
// Looking around
// =============================================================================

#[test]
fn look_defaults_to_the_actor_location() {
    let mut session = demo_session();
    let result = session.execute(&Command::new("look", "player")).unwrap();
    assert!(result.success);
    assert!(result.message.unwrap().contains("study lined with bookshelves"));
}

#[test]
fn look_at_an_object_reads_its_description() {
    let mut session = demo_session();
    let (ok, message) = play(&mut session, "l", "clock");
    assert!(ok);
    assert!(message.contains("pendulum"));
}

// =============================================================================
// The trace tells the story
// =============================================================================

#[test]
fn one_take_traces_every_layer() {
    let mut session = demo_session();
    play(&mut session, "take", "lamp");

    let lines: Vec<String> = session.trace().iter().map(ToString::to_string).collect();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l == needle)
            .unwrap_or_else(|| panic!("missing trace line {needle:?} in {lines:#?}"))
    };

    let command = position("command take by player on lamp");
    let handler = position("handler house.rules takes take");
    let delegate = position("delegate take to core.actions (depth 1)");
    let reaction = position("reaction core.weight on_take -> allow");
    let gate = position("gate on_take on lamp -> open");
    let mutate = position("mutate lamp carried -> ok");

    assert!(command < handler);
    assert!(handler < delegate);
    assert!(delegate < reaction);
    assert!(reaction < gate);
    assert!(gate < mutate);
}

// =============================================================================
// Turns
// =============================================================================

#[test]
fn turns_between_commands_move_the_clock() {
    let mut session = demo_session();
    play(&mut session, "take", "watch");
    let report = session.run_turn().unwrap();
    assert_eq!(report.turn, 1);
    assert_eq!(report.phases_run, 1);
    session.run_turn().unwrap();

    let clock = session.world().entity("clock").unwrap();
    assert_eq!(clock.property("minutes"), Some(&Value::Int(2)));
    // The watch stayed carried across turns.
    let watch = session.world().entity("watch").unwrap();
    assert_eq!(watch.property("carried"), Some(&Value::Bool(true)));
}
