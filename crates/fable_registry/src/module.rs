//! Module values: the unit of registration.
//!
//! A module is plain data — a name, an origin class, vocabulary, and tables
//! of plain function pointers. Nothing is discovered at runtime; what a
//! module contributes is exactly what its builder was told.

use std::sync::Arc;

use crate::access::{HandlerFn, PhaseFn, ReactionFn};
use crate::hooks::HookDefinition;
use crate::vocabulary::VerbEntry;

// =============================================================================
// Origin Class
// =============================================================================

/// Provenance tier of a module.
///
/// Registration runs in two deterministic passes: every `Base` module (sorted
/// by name), then every `Overlay` module (sorted by name). Two modules of one
/// class may never bind the same verb, word, or hook divergently; an
/// `Overlay` module may rebind what a `Base` module declared, and the later
/// binding wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OriginClass {
    /// The stock module set a game starts from.
    Base,
    /// Game-local modules allowed to override `Base` registrations.
    Overlay,
}

impl std::fmt::Display for OriginClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Overlay => write!(f, "overlay"),
        }
    }
}

// =============================================================================
// Module
// =============================================================================

/// A registered bundle of vocabulary, handlers, reactions, and hooks.
#[derive(Clone, Debug)]
pub struct Module {
    name: Arc<str>,
    origin: OriginClass,
    vocabulary: Vec<VerbEntry>,
    handlers: Vec<(Arc<str>, HandlerFn)>,
    reactions: Vec<(Arc<str>, ReactionFn)>,
    hooks: Vec<HookDefinition>,
    phases: Vec<(Arc<str>, PhaseFn)>,
}

impl Module {
    /// Starts building a module with a qualified name and an origin class.
    #[must_use]
    pub fn build(name: impl Into<Arc<str>>, origin: OriginClass) -> ModuleBuilder {
        ModuleBuilder {
            module: Self {
                name: name.into(),
                origin,
                vocabulary: Vec::new(),
                handlers: Vec::new(),
                reactions: Vec::new(),
                hooks: Vec::new(),
                phases: Vec::new(),
            },
        }
    }

    /// Returns the qualified module name.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the origin class.
    #[must_use]
    pub const fn origin(&self) -> OriginClass {
        self.origin
    }

    /// Returns the declared vocabulary entries.
    #[must_use]
    pub fn vocabulary(&self) -> &[VerbEntry] {
        &self.vocabulary
    }

    /// Returns the declared verb handlers.
    #[must_use]
    pub fn handlers(&self) -> &[(Arc<str>, HandlerFn)] {
        &self.handlers
    }

    /// Returns the declared event reactions.
    #[must_use]
    pub fn reactions(&self) -> &[(Arc<str>, ReactionFn)] {
        &self.reactions
    }

    /// Returns the declared hook definitions.
    #[must_use]
    pub fn hooks(&self) -> &[HookDefinition] {
        &self.hooks
    }

    /// Returns the declared turn-phase functions, keyed by hook name.
    #[must_use]
    pub fn phases(&self) -> &[(Arc<str>, PhaseFn)] {
        &self.phases
    }
}

/// Builder for [`Module`] values.
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    /// Declares a vocabulary entry.
    #[must_use]
    pub fn with_verb(mut self, entry: VerbEntry) -> Self {
        self.module.vocabulary.push(entry);
        self
    }

    /// Registers a handler for a verb word.
    ///
    /// The word may be a canonical verb or a synonym; the registry resolves
    /// it against the merged vocabulary at finalize.
    #[must_use]
    pub fn with_handler(mut self, verb: impl Into<Arc<str>>, handler: HandlerFn) -> Self {
        self.module.handlers.push((verb.into(), handler));
        self
    }

    /// Registers a reaction for an event name.
    #[must_use]
    pub fn with_reaction(mut self, event: impl Into<Arc<str>>, reaction: ReactionFn) -> Self {
        self.module.reactions.push((event.into(), reaction));
        self
    }

    /// Declares an entity hook (metadata only; reactions carry the code).
    #[must_use]
    pub fn with_entity_hook(mut self, hook: HookDefinition) -> Self {
        self.module.hooks.push(hook);
        self
    }

    /// Declares a turn-phase hook together with its function.
    #[must_use]
    pub fn with_turn_phase(mut self, hook: HookDefinition, phase: PhaseFn) -> Self {
        self.module.phases.push((hook.name().clone(), phase));
        self.module.hooks.push(hook);
        self
    }

    /// Finishes the module.
    ///
    /// Validation happens at registry finalize, where conflicts across
    /// modules are visible.
    #[must_use]
    pub fn finish(self) -> Module {
        self.module
    }
}
