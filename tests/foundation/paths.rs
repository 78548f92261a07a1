//! Integration tests for mutation paths.
//!
//! Tests the parse-once path AST and ordered application of change sets.

use fable_foundation::{
    Changes, ErrorKind, MutationPath, PathOp, PropMap, Value, apply_mutation, read_path,
};

fn fold(props: &PropMap, changes: &Changes) -> Result<PropMap, fable_foundation::Error> {
    let mut current = props.clone();
    for (path, value) in changes {
        current = apply_mutation(&current, path, value)?;
    }
    Ok(current)
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn paths_parse_once_into_an_ast() {
    let path = MutationPath::parse("+stats.effects").unwrap();
    assert_eq!(path.op(), PathOp::Append);
    assert_eq!(path.segments().len(), 2);
    assert_eq!(&*path.segments()[0], "stats");
    assert_eq!(&*path.segments()[1], "effects");
}

#[test]
fn path_display_round_trips() {
    for text in ["hp", "stats.hp", "+inventory", "-tags.seen"] {
        let path = MutationPath::parse(text).unwrap();
        assert_eq!(path.to_string(), text);
    }
}

#[test]
fn bad_paths_fail_at_parse_time() {
    for bad in ["", "+", "-", "a..b", ".a", "a.", "+."] {
        assert!(
            MutationPath::parse(bad).is_err(),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn from_str_matches_parse() {
    let parsed: MutationPath = "stats.hp".parse().unwrap();
    assert_eq!(parsed, MutationPath::parse("stats.hp").unwrap());
}

// =============================================================================
// Ordered Application
// =============================================================================

#[test]
fn changes_apply_in_declaration_order() {
    let changes = Changes::new()
        .with("counter", 1_i64)
        .unwrap()
        .with("counter", 2_i64)
        .unwrap()
        .with("counter", 3_i64)
        .unwrap();

    let out = fold(&PropMap::new(), &changes).unwrap();
    assert_eq!(read_path(&out, "counter"), Some(&Value::Int(3)));
}

#[test]
fn append_then_remove_in_one_change_set() {
    let changes = Changes::new()
        .with("+inventory", "rope")
        .unwrap()
        .with("+inventory", "coin")
        .unwrap()
        .with("-inventory", "rope")
        .unwrap();

    let out = fold(&PropMap::new(), &changes).unwrap();
    let list = read_path(&out, "inventory").unwrap().as_list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.first(), Some(&Value::from("coin")));
}

#[test]
fn fold_stops_at_first_failure() {
    let changes = Changes::new()
        .with("applied", true)
        .unwrap()
        .with("-ledger", "missing")
        .unwrap()
        .with("never", true)
        .unwrap();

    let err = fold(&PropMap::new(), &changes).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PathNotAList { .. }));
}

#[test]
fn set_builds_nested_maps_and_remove_needs_them() {
    let set = MutationPath::parse("bag.pockets.left").unwrap();
    let out = apply_mutation(&PropMap::new(), &set, &Value::from("lint")).unwrap();
    assert_eq!(read_path(&out, "bag.pockets.left"), Some(&Value::from("lint")));

    let remove = MutationPath::parse("-bag.pockets.right").unwrap();
    let err = apply_mutation(&out, &remove, &Value::from("lint")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PathNotAList { .. }));
}

#[test]
fn remove_of_absent_value_is_an_error_not_a_noop() {
    let base = PropMap::new().insert(
        "inventory".into(),
        Value::List([Value::from("coin")].into_iter().collect()),
    );
    let remove = MutationPath::parse("-inventory").unwrap();
    let err = apply_mutation(&base, &remove, &Value::from("anvil")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PathValueNotFound { .. }));

    // The input map is unchanged.
    let list = read_path(&base, "inventory").unwrap().as_list().unwrap();
    assert_eq!(list.len(), 1);
}
