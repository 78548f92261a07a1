//! Integration tests for merged vocabulary.
//!
//! Synonyms, events, object requirements, and the override rules between
//! origin classes.

use fable_foundation::ErrorKind;
use fable_registry::{Module, ModuleRegistry, OriginClass, RegistryBuilder, VerbEntry};

fn finalize(modules: Vec<Module>) -> Result<ModuleRegistry, fable_foundation::Error> {
    let mut builder = RegistryBuilder::new();
    for module in modules {
        builder = builder.register(module)?;
    }
    builder.finalize()
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn synonyms_resolve_to_the_canonical_entry() {
    let registry = finalize(vec![
        Module::build("core.take", OriginClass::Base)
            .with_verb(
                VerbEntry::new("take")
                    .with_synonym("get")
                    .with_synonym("grab")
                    .with_event("on_take")
                    .with_object_required(),
            )
            .finish(),
    ])
    .unwrap();

    let vocabulary = registry.vocabulary();
    for word in ["take", "get", "grab"] {
        let entry = vocabulary.resolve(word).unwrap();
        assert_eq!(entry.word().as_ref(), "take");
        assert_eq!(entry.event().map(AsRef::as_ref), Some("on_take"));
        assert!(entry.object_required());
    }
    assert!(vocabulary.resolve("steal").is_none());
}

#[test]
fn distinct_words_from_many_modules_coexist() {
    let registry = finalize(vec![
        Module::build("core.take", OriginClass::Base)
            .with_verb(VerbEntry::new("take"))
            .finish(),
        Module::build("core.look", OriginClass::Base)
            .with_verb(VerbEntry::new("look").with_synonym("l"))
            .finish(),
    ])
    .unwrap();

    assert_eq!(registry.vocabulary().len(), 3);
    assert!(registry.vocabulary().resolve("l").is_some());
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn same_class_surface_collision_fails() {
    let err = finalize(vec![
        Module::build("core.take", OriginClass::Base)
            .with_verb(VerbEntry::new("take").with_synonym("get"))
            .finish(),
        Module::build("core.fetch", OriginClass::Base)
            .with_verb(VerbEntry::new("fetch").with_synonym("get"))
            .finish(),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VocabularyConflict { .. }));
}

#[test]
fn identical_redeclaration_in_the_same_class_is_tolerated() {
    let entry = || VerbEntry::new("take").with_event("on_take");
    let registry = finalize(vec![
        Module::build("core.a", OriginClass::Base)
            .with_verb(entry())
            .finish(),
        Module::build("core.b", OriginClass::Base)
            .with_verb(entry())
            .finish(),
    ])
    .unwrap();
    assert!(registry.vocabulary().resolve("take").is_some());
}

#[test]
fn events_must_look_like_events() {
    let err = finalize(vec![
        Module::build("core.take", OriginClass::Base)
            .with_verb(VerbEntry::new("take").with_event("taking"))
            .finish(),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedVocabulary { .. }));
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn overlay_redeclaration_replaces_the_entry_wholesale() {
    let registry = finalize(vec![
        Module::build("core.take", OriginClass::Base)
            .with_verb(
                VerbEntry::new("take")
                    .with_synonym("get")
                    .with_event("on_take")
                    .with_object_required(),
            )
            .finish(),
        Module::build("house.rules", OriginClass::Overlay)
            .with_verb(VerbEntry::new("take").with_synonym("pilfer"))
            .finish(),
    ])
    .unwrap();

    let entry = registry.vocabulary().resolve("take").unwrap();
    // The overlay entry has no event and no object requirement.
    assert_eq!(entry.event(), None);
    assert!(!entry.object_required());
    assert!(registry.vocabulary().resolve("pilfer").is_some());

    // The base synonym still reaches the (replaced) canonical entry.
    let via_get = registry.vocabulary().resolve("get").unwrap();
    assert_eq!(via_get.word().as_ref(), "take");
    assert_eq!(via_get.event(), None);
}

#[test]
fn overlay_synonym_may_capture_a_base_word() {
    let registry = finalize(vec![
        Module::build("core.look", OriginClass::Base)
            .with_verb(VerbEntry::new("look"))
            .finish(),
        Module::build("house.rules", OriginClass::Overlay)
            .with_verb(VerbEntry::new("survey").with_synonym("look"))
            .finish(),
    ])
    .unwrap();

    // "look" now dispatches to survey.
    let entry = registry.vocabulary().resolve("look").unwrap();
    assert_eq!(entry.word().as_ref(), "survey");
}
