//! Integration tests for module registration and load order.
//!
//! Base modules load before overlays, names break ties, and conflicts
//! inside one origin class fail finalization loudly.

use fable_foundation::{Command, ErrorKind, HandlerResult, Result};
use fable_registry::{
    Accessor, HandlerFn, Module, ModuleRegistry, OriginClass, RegistryBuilder, VerbEntry,
};
use fable_world::{Entity, World};
use std::ptr;

fn base_take(_accessor: &mut dyn Accessor, _command: &Command) -> Result<HandlerResult> {
    Ok(HandlerResult::success().with_message("base take"))
}

fn overlay_take(_accessor: &mut dyn Accessor, _command: &Command) -> Result<HandlerResult> {
    Ok(HandlerResult::success().with_message("overlay take"))
}

fn rival_take(_accessor: &mut dyn Accessor, _command: &Command) -> Result<HandlerResult> {
    Ok(HandlerResult::success().with_message("rival take"))
}

fn take_module(name: &str, origin: OriginClass) -> Module {
    Module::build(name, origin)
        .with_verb(VerbEntry::new("take").with_event("on_take"))
        .with_handler("take", base_take)
        .finish()
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn duplicate_module_names_fail_at_registration() {
    let err = RegistryBuilder::new()
        .register(take_module("core.take", OriginClass::Base))
        .unwrap()
        .register(take_module("core.take", OriginClass::Overlay))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateModule { .. }));
}

#[test]
fn finalize_consumes_the_builder_into_an_immutable_registry() {
    let registry = RegistryBuilder::new()
        .register(take_module("core.take", OriginClass::Base))
        .unwrap()
        .finalize()
        .unwrap();

    assert!(registry.has_module("core.take"));
    let names = registry.module_names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].as_ref(), "core.take");
}

// =============================================================================
// Load Order
// =============================================================================

#[test]
fn load_order_is_origin_class_then_name() {
    // Registered out of order on purpose.
    let registry = RegistryBuilder::new()
        .register(
            Module::build("zeta.mod", OriginClass::Overlay)
                .with_handler("take", overlay_take)
                .finish(),
        )
        .unwrap()
        .register(take_module("zeta.core", OriginClass::Base))
        .unwrap()
        .register(
            Module::build("alpha.core", OriginClass::Base)
                .with_handler("take", rival_take)
                .finish(),
        )
        .unwrap()
        .finalize();

    // alpha.core and zeta.core both bind a take handler in the Base class.
    let err = registry.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateHandler { .. }));
    if let ErrorKind::DuplicateHandler {
        first_module,
        second_module,
        ..
    } = err.kind
    {
        // Name order within the class decides who is "first".
        assert_eq!(first_module, "alpha.core");
        assert_eq!(second_module, "zeta.core");
    }
}

#[test]
fn cross_class_handlers_chain_in_load_order() {
    let registry = RegistryBuilder::new()
        .register(
            Module::build("house.rules", OriginClass::Overlay)
                .with_handler("take", overlay_take)
                .finish(),
        )
        .unwrap()
        .register(take_module("core.take", OriginClass::Base))
        .unwrap()
        .finalize()
        .unwrap();

    let chain = registry.handler_chain("take").unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].module().as_ref(), "core.take");
    assert_eq!(chain[1].module().as_ref(), "house.rules");
    assert!(ptr::fn_addr_eq(chain[0].func(), base_take as HandlerFn));
    assert!(ptr::fn_addr_eq(chain[1].func(), overlay_take as HandlerFn));

    // The resolver lands on the end of the chain, the overlay's handler.
    let active = registry.resolve_handler("take").unwrap();
    assert!(ptr::fn_addr_eq(active.func(), overlay_take as HandlerFn));
}

#[test]
fn handler_for_undeclared_verb_fails_finalize() {
    let err = RegistryBuilder::new()
        .register(
            Module::build("core.dance", OriginClass::Base)
                .with_handler("dance", base_take)
                .finish(),
        )
        .unwrap()
        .finalize()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HandlerWithoutVerb { .. }));
}

// =============================================================================
// Reactions
// =============================================================================

#[test]
fn one_module_cannot_react_to_the_same_event_twice() {
    use fable_foundation::EventResult;
    use fable_registry::EventContext;

    fn lenient(
        _entity: &Entity,
        _accessor: &mut dyn Accessor,
        _context: &EventContext,
    ) -> Result<EventResult> {
        Ok(EventResult::allow())
    }

    let err = RegistryBuilder::new()
        .register(
            Module::build("core.guard", OriginClass::Base)
                .with_reaction("on_take", lenient)
                .with_reaction("on_take", lenient)
                .finish(),
        )
        .unwrap()
        .finalize()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateReaction { .. }));
}

// =============================================================================
// World Validation
// =============================================================================

#[test]
fn validate_world_accepts_known_behaviors() {
    let registry = RegistryBuilder::new()
        .register(take_module("core.take", OriginClass::Base))
        .unwrap()
        .finalize()
        .unwrap();

    let world = World::new().insert(Entity::new("lamp").with_behavior("core.take"));
    assert!(registry.validate_world(&world).is_ok());
}

#[test]
fn validate_world_suggests_near_miss_module_names() {
    let registry = RegistryBuilder::new()
        .register(take_module("core.portable", OriginClass::Base))
        .unwrap()
        .finalize()
        .unwrap();

    let world = World::new().insert(Entity::new("lamp").with_behavior("core.portible"));
    let err = registry.validate_world(&world).unwrap_err();
    match err.kind {
        ErrorKind::UnknownBehavior { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("core.portable"));
        }
        other => panic!("expected UnknownBehavior, got {other:?}"),
    }
}

#[test]
fn validate_world_rejects_hooks_in_behavior_lists() {
    fn tick(_accessor: &mut dyn Accessor) -> Result<()> {
        Ok(())
    }

    let registry = RegistryBuilder::new()
        .register(
            Module::build("core.clock", OriginClass::Base)
                .with_turn_phase(fable_registry::HookDefinition::turn_phase("turn_tick"), tick)
                .finish(),
        )
        .unwrap()
        .finalize()
        .unwrap();

    let world = World::new().insert(Entity::new("lamp").with_behavior("turn_tick"));
    let err = registry.validate_world(&world).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::BehaviorNamesHook { .. }));
}

// =============================================================================
// Suggestions
// =============================================================================

#[test]
fn suggest_module_uses_edit_distance() {
    let registry: ModuleRegistry = RegistryBuilder::new()
        .register(take_module("core.weight", OriginClass::Base))
        .unwrap()
        .finalize()
        .unwrap();

    assert_eq!(
        registry.suggest_module("core.wieght").as_deref(),
        Some("core.weight")
    );
    assert_eq!(registry.suggest_module("utterly.unrelated.name"), None);
}
