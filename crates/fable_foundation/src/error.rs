//! Error types for the Fable core.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Errors here are the loud tier: module registration conflicts, hook graph
//! problems, path failures, and internal bugs. Expected gameplay outcomes
//! (refusals, vetoes, failed mutations) travel as result values instead and
//! never appear as [`Error`].

use std::fmt;

use thiserror::Error;

use crate::entity_id::EntityId;

/// Convenience alias used throughout the Fable crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Fable operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate module registration error.
    #[must_use]
    pub fn duplicate_module(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateModule { name: name.into() })
    }

    /// Creates a malformed vocabulary error.
    #[must_use]
    pub fn malformed_vocabulary(module: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedVocabulary {
            module: module.into(),
            detail: detail.into(),
        })
    }

    /// Creates a same-class vocabulary conflict error.
    #[must_use]
    pub fn vocabulary_conflict(
        word: impl Into<String>,
        first_module: impl Into<String>,
        second_module: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::VocabularyConflict {
            word: word.into(),
            first_module: first_module.into(),
            second_module: second_module.into(),
        })
    }

    /// Creates a same-class duplicate handler error.
    #[must_use]
    pub fn duplicate_handler(
        verb: impl Into<String>,
        first_module: impl Into<String>,
        second_module: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DuplicateHandler {
            verb: verb.into(),
            first_module: first_module.into(),
            second_module: second_module.into(),
        })
    }

    /// Creates an error for a handler whose verb is absent from the vocabulary.
    #[must_use]
    pub fn handler_without_verb(verb: impl Into<String>, module: impl Into<String>) -> Self {
        Self::new(ErrorKind::HandlerWithoutVerb {
            verb: verb.into(),
            module: module.into(),
        })
    }

    /// Creates an error for a module registering one event's reaction twice.
    #[must_use]
    pub fn duplicate_reaction(event: impl Into<String>, module: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateReaction {
            event: event.into(),
            module: module.into(),
        })
    }

    /// Creates a same-class duplicate hook definition error.
    #[must_use]
    pub fn duplicate_hook(
        name: impl Into<String>,
        first_module: impl Into<String>,
        second_module: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DuplicateHook {
            name: name.into(),
            first_module: first_module.into(),
            second_module: second_module.into(),
        })
    }

    /// Creates a hook kind mismatch error (declared kind vs. name prefix).
    #[must_use]
    pub fn hook_kind_mismatch(
        name: impl Into<String>,
        declared: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::HookKindMismatch {
            name: name.into(),
            declared: declared.into(),
            expected: expected.into(),
        })
    }

    /// Creates an unknown hook dependency error.
    #[must_use]
    pub fn unknown_hook_dependency(hook: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownHookDependency {
            hook: hook.into(),
            dependency: dependency.into(),
        })
    }

    /// Creates a cross-kind hook dependency error.
    #[must_use]
    pub fn hook_dependency_kind(hook: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::new(ErrorKind::HookDependencyKind {
            hook: hook.into(),
            dependency: dependency.into(),
        })
    }

    /// Creates a hook dependency cycle error.
    #[must_use]
    pub fn hook_dependency_cycle(cycle: Vec<String>) -> Self {
        Self::new(ErrorKind::HookDependencyCycle { cycle })
    }

    /// Creates an unknown behavior reference error.
    #[must_use]
    pub fn unknown_behavior(
        entity: EntityId,
        name: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownBehavior {
            entity,
            name: name.into(),
            suggestion,
        })
    }

    /// Creates an error for a behaviors entry that names a hook.
    #[must_use]
    pub fn behavior_names_hook(entity: EntityId, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::BehaviorNamesHook {
            entity,
            name: name.into(),
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a path syntax error.
    #[must_use]
    pub fn path_syntax(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathSyntax {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Creates an error for traversing through a non-map value.
    #[must_use]
    pub fn path_not_a_map(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathNotAMap {
            path: path.into(),
            segment: segment.into(),
        })
    }

    /// Creates an error for a list operation on a non-list slot.
    #[must_use]
    pub fn path_not_a_list(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathNotAList { path: path.into() })
    }

    /// Creates an error for removing a value absent from its list.
    #[must_use]
    pub fn path_value_not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathValueNotFound { path: path.into() })
    }

    /// Creates a session halted error.
    #[must_use]
    pub fn session_halted() -> Self {
        Self::new(ErrorKind::SessionHalted)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A module name was registered twice.
    #[error("duplicate module registration: {name}")]
    DuplicateModule {
        /// The qualified module name.
        name: String,
    },

    /// A vocabulary declaration failed validation.
    #[error("malformed vocabulary in module {module}: {detail}")]
    MalformedVocabulary {
        /// The declaring module.
        module: String,
        /// What was wrong with the declaration.
        detail: String,
    },

    /// Two same-class modules bound a surface word divergently.
    #[error("vocabulary conflict on {word:?}: {first_module} and {second_module} share an origin class")]
    VocabularyConflict {
        /// The verb or synonym word.
        word: String,
        /// The module that bound the word first.
        first_module: String,
        /// The module whose binding conflicts.
        second_module: String,
    },

    /// Two same-class modules registered a handler for one verb.
    #[error("duplicate handler for {verb:?}: {first_module} and {second_module} share an origin class")]
    DuplicateHandler {
        /// The canonical verb.
        verb: String,
        /// The module that registered first.
        first_module: String,
        /// The module whose handler conflicts.
        second_module: String,
    },

    /// A handler was registered for a verb no vocabulary declares.
    #[error("handler in module {module} targets undeclared verb {verb:?}")]
    HandlerWithoutVerb {
        /// The unknown verb.
        verb: String,
        /// The registering module.
        module: String,
    },

    /// One module registered two reactions for one event.
    #[error("module {module} registers event {event:?} twice")]
    DuplicateReaction {
        /// The event name.
        event: String,
        /// The registering module.
        module: String,
    },

    /// Two same-class modules defined one hook name.
    #[error("duplicate hook definition {name:?}: {first_module} and {second_module} share an origin class")]
    DuplicateHook {
        /// The hook name.
        name: String,
        /// The module that defined it first.
        first_module: String,
        /// The module whose definition conflicts.
        second_module: String,
    },

    /// A hook's declared kind disagrees with its name prefix.
    #[error("hook {name:?} declared as {declared} but its name implies {expected}")]
    HookKindMismatch {
        /// The hook name.
        name: String,
        /// The declared kind.
        declared: String,
        /// The kind the name prefix implies.
        expected: String,
    },

    /// A hook's `after` list references an undefined hook.
    #[error("hook {hook:?} runs after undefined hook {dependency:?}")]
    UnknownHookDependency {
        /// The hook carrying the reference.
        hook: String,
        /// The missing dependency name.
        dependency: String,
    },

    /// A hook's `after` list crosses hook kinds.
    #[error("hook {hook:?} cannot order itself after {dependency:?}: the kinds differ")]
    HookDependencyKind {
        /// The hook carrying the reference.
        hook: String,
        /// The dependency of the other kind.
        dependency: String,
    },

    /// The hook dependency graph contains a cycle.
    #[error("hook dependency cycle: {}", cycle.join(" -> "))]
    HookDependencyCycle {
        /// The hooks forming the cycle, in reference order.
        cycle: Vec<String>,
    },

    /// An entity's behaviors list names an unregistered module.
    #[error("entity {entity} references unknown behavior module {name:?}{}",
        suggestion.as_ref().map(|s| format!(" (did you mean {s:?}?)")).unwrap_or_default())]
    UnknownBehavior {
        /// The referencing entity.
        entity: EntityId,
        /// The unknown module name.
        name: String,
        /// Nearest registered module name, if any is close.
        suggestion: Option<String>,
    },

    /// An entity's behaviors list names a hook instead of a module.
    #[error("entity {entity} lists hook {name:?} as a behavior; behaviors name modules")]
    BehaviorNamesHook {
        /// The referencing entity.
        entity: EntityId,
        /// The hook name found in the behaviors list.
        name: String,
    },

    /// Entity was not found in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A mutation path failed to parse.
    #[error("bad mutation path {path:?}: {reason}")]
    PathSyntax {
        /// The offending path text.
        path: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// A path traversed through a non-map value.
    #[error("path {path:?} crosses non-map value at segment {segment:?}")]
    PathNotAMap {
        /// The full path being applied.
        path: String,
        /// The segment where traversal stopped.
        segment: String,
    },

    /// A list operation targeted a slot that holds no list.
    #[error("path {path:?} expects a list at its final segment")]
    PathNotAList {
        /// The full path being applied.
        path: String,
    },

    /// A list removal targeted a value the list does not contain.
    #[error("path {path:?} removes a value not present in the list")]
    PathValueNotFound {
        /// The full path being applied.
        path: String,
    },

    /// The session halted after an inconsistent-state escalation.
    #[error("session halted: world state is inconsistent")]
    SessionHalted,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The module involved, if any.
    pub module: Option<String>,
    /// The entity involved, if any.
    pub entity: Option<EntityId>,
    /// Stack of dispatch/turn frames.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            module: None,
            entity: None,
            stack: Vec::new(),
        }
    }

    /// Sets the module name.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "in module {module}")?;
        }
        if let Some(entity) = &self.entity {
            if self.module.is_some() {
                write!(f, ", ")?;
            }
            write!(f, "entity {entity}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
