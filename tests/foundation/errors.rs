//! Integration tests for the error type.
//!
//! Tests error construction, display text, and context attachment.

use fable_foundation::{EntityId, Error, ErrorContext, ErrorKind};

// =============================================================================
// Construction and Display
// =============================================================================

#[test]
fn registration_errors_name_both_modules() {
    let err = Error::duplicate_handler("take", "core.take", "mod.sticky");
    let text = err.to_string();
    assert!(text.contains("take"));
    assert!(text.contains("core.take"));
    assert!(text.contains("mod.sticky"));
    assert!(matches!(err.kind, ErrorKind::DuplicateHandler { .. }));
}

#[test]
fn cycle_errors_render_the_loop() {
    let err = Error::hook_dependency_cycle(vec![
        "turn_weather".into(),
        "turn_tides".into(),
        "turn_weather".into(),
    ]);
    assert_eq!(
        err.to_string(),
        "hook dependency cycle: turn_weather -> turn_tides -> turn_weather"
    );
}

#[test]
fn unknown_behavior_mentions_suggestion_when_present() {
    let with = Error::unknown_behavior(
        EntityId::new("lamp"),
        "core.portible",
        Some("core.portable".into()),
    );
    assert!(with.to_string().contains("core.portable"));

    let without = Error::unknown_behavior(EntityId::new("lamp"), "zzz", None);
    assert!(without.to_string().contains("zzz"));
}

#[test]
fn path_errors_quote_the_path() {
    let err = Error::path_not_a_list("+name");
    assert!(err.to_string().contains("\"+name\""));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_attaches_module_entity_and_frames() {
    let err = Error::internal("boom").with_context(
        ErrorContext::new()
            .with_module("core.clock")
            .with_entity(EntityId::new("clock"))
            .with_frame("turn phase turn_tick"),
    );

    let context = err.context.as_ref().unwrap();
    let rendered = context.to_string();
    assert!(rendered.contains("core.clock"));
    assert!(rendered.contains("clock"));
    assert!(rendered.contains("turn phase turn_tick"));
}

#[test]
fn errors_without_context_carry_none() {
    let err = Error::duplicate_module("core.take");
    assert!(err.context.is_none());
}
