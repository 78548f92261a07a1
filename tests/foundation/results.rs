//! Integration tests for the outcome types.
//!
//! Refusals, vetoes, and failed updates are values, not errors; these tests
//! pin down the shapes callers pattern-match on.

use fable_foundation::{EventResult, HandlerResult, UpdateResult, Value};

// =============================================================================
// HandlerResult
// =============================================================================

#[test]
fn handler_success_and_failure() {
    let ok = HandlerResult::success().with_message("Taken.");
    assert!(ok.success);
    assert_eq!(ok.message.as_deref(), Some("Taken."));

    let refused = HandlerResult::failure("It's bolted down.");
    assert!(!refused.success);
    assert_eq!(refused.message.as_deref(), Some("It's bolted down."));
}

#[test]
fn stock_refusals_carry_structured_reasons() {
    let unknown = HandlerResult::unknown_verb("xyzzy");
    assert!(!unknown.success);
    assert_eq!(unknown.data.get("reason"), Some(&Value::from("unknown-verb")));
    assert_eq!(unknown.data.get("verb"), Some(&Value::from("xyzzy")));
    assert!(unknown.message.unwrap().contains("xyzzy"));

    let missing = HandlerResult::missing_target("take");
    assert_eq!(
        missing.data.get("reason"),
        Some(&Value::from("missing-target"))
    );
}

// =============================================================================
// EventResult
// =============================================================================

#[test]
fn event_allow_and_veto() {
    let allow = EventResult::allow();
    assert!(allow.allowed);
    assert_eq!(allow.message, None);

    let veto = EventResult::veto("Too heavy.").with_data("overweight", 4_i64);
    assert!(!veto.allowed);
    assert_eq!(veto.message.as_deref(), Some("Too heavy."));
    assert_eq!(veto.data.get("overweight"), Some(&Value::Int(4)));
}

// =============================================================================
// UpdateResult
// =============================================================================

#[test]
fn update_success_failure_and_inconsistency() {
    assert!(UpdateResult::success().success);

    let failed = UpdateResult::failure("no such list");
    assert!(!failed.success);
    assert!(!failed.is_inconsistent());

    let torn = UpdateResult::inconsistent("2 of 3 changes applied to door");
    assert!(!torn.success);
    assert!(torn.is_inconsistent());
}

#[test]
fn inconsistent_marker_is_distinguishable_in_text() {
    let torn = UpdateResult::inconsistent("2 of 3 changes applied to door");
    let message = torn.message.unwrap();
    assert!(message.starts_with(UpdateResult::INCONSISTENT_STATE_MARKER));
    assert!(message.contains("2 of 3 changes applied to door"));

    // An ordinary failure never carries the marker.
    let failed = UpdateResult::failure("no such list");
    assert!(
        !failed
            .message
            .unwrap()
            .contains(UpdateResult::INCONSISTENT_STATE_MARKER)
    );
}

#[test]
fn merged_data_is_later_wins() {
    let base = UpdateResult::success().with_data("noise", "thud");
    let payload = fable_foundation::PropMap::new()
        .insert("noise".into(), Value::from("clang"))
        .insert("echo".into(), Value::Bool(true));

    let merged = base.with_merged_data(&payload);
    assert_eq!(merged.data.get("noise"), Some(&Value::from("clang")));
    assert_eq!(merged.data.get("echo"), Some(&Value::Bool(true)));
}
