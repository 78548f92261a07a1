//! Module registration and the finalized, immutable registry.
//!
//! [`RegistryBuilder`] collects modules through an explicit registration
//! table; nothing is discovered by scanning. [`RegistryBuilder::finalize`]
//! fixes the deterministic load order (base class first, names sorted within
//! each class), merges vocabularies, builds handler override chains, indexes
//! reactions, validates the hook graph, and precomputes the turn-phase
//! schedule. The resulting [`ModuleRegistry`] never changes, so every
//! lookup during play is read-only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fable_foundation::{Error, Result};
use fable_world::World;

use crate::access::{HandlerFn, PhaseFn, ReactionFn};
use crate::hooks::{HookDefinition, HookKind, topological_order};
use crate::module::{Module, OriginClass};
use crate::vocabulary::MergedVocabulary;

/// Maximum edit distance for "did you mean" module suggestions.
const SUGGESTION_DISTANCE: usize = 3;

// =============================================================================
// Registry Entries
// =============================================================================

/// One handler in a verb's override chain, oldest first.
#[derive(Clone, Debug)]
pub struct HandlerEntry {
    module: Arc<str>,
    origin: OriginClass,
    func: HandlerFn,
}

impl HandlerEntry {
    /// Returns the registering module.
    #[must_use]
    pub fn module(&self) -> &Arc<str> {
        &self.module
    }

    /// Returns the registering module's origin class.
    #[must_use]
    pub const fn origin(&self) -> OriginClass {
        self.origin
    }

    /// Returns the handler function.
    #[must_use]
    pub const fn func(&self) -> HandlerFn {
        self.func
    }
}

/// One module's reaction to an event, as listed by
/// [`ModuleRegistry::resolve_reactions`].
#[derive(Clone, Debug)]
pub struct ReactionEntry {
    module: Arc<str>,
    func: ReactionFn,
}

impl ReactionEntry {
    /// Returns the reacting module.
    #[must_use]
    pub fn module(&self) -> &Arc<str> {
        &self.module
    }

    /// Returns the reaction function.
    #[must_use]
    pub const fn func(&self) -> ReactionFn {
        self.func
    }
}

/// One turn phase in its scheduled position.
#[derive(Clone, Debug)]
pub struct PhaseEntry {
    name: Arc<str>,
    module: Arc<str>,
    func: PhaseFn,
}

impl PhaseEntry {
    /// Returns the phase hook name.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the module whose definition won.
    #[must_use]
    pub fn module(&self) -> &Arc<str> {
        &self.module
    }

    /// Returns the phase function.
    #[must_use]
    pub const fn func(&self) -> PhaseFn {
        self.func
    }
}

// =============================================================================
// Registry Builder
// =============================================================================

/// Collects modules before the registry is finalized.
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<Module>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns an error when a module with the same qualified name is
    /// already registered.
    pub fn register(mut self, module: Module) -> Result<Self> {
        if self.modules.iter().any(|m| m.name() == module.name()) {
            return Err(Error::duplicate_module(module.name().to_string()));
        }
        self.modules.push(module);
        Ok(self)
    }

    /// Finalizes registration into an immutable registry.
    ///
    /// # Errors
    ///
    /// Returns the first vocabulary, handler, reaction, or hook problem
    /// found. A registry is only produced when every module checks out.
    pub fn finalize(mut self) -> Result<ModuleRegistry> {
        // Deterministic load order: base class first, names sorted within
        // each class. Everything downstream leans on this order.
        self.modules.sort_by(|a, b| {
            a.origin()
                .cmp(&b.origin())
                .then_with(|| a.name().cmp(b.name()))
        });

        let vocabulary = MergedVocabulary::merge(&self.modules)?;
        let handlers = merge_handlers(&self.modules, &vocabulary)?;
        let reactions = merge_reactions(&self.modules)?;
        let (hooks, phases) = merge_hooks(&self.modules)?;

        let module_names: Vec<Arc<str>> =
            self.modules.iter().map(|m| m.name().clone()).collect();
        let module_set: HashSet<Arc<str>> = module_names.iter().cloned().collect();

        Ok(ModuleRegistry {
            module_names,
            module_set,
            vocabulary,
            handlers,
            reactions,
            hooks,
            phases,
        })
    }
}

fn merge_handlers(
    modules: &[Module],
    vocabulary: &MergedVocabulary,
) -> Result<HashMap<Arc<str>, Vec<HandlerEntry>>> {
    let mut chains: HashMap<Arc<str>, Vec<HandlerEntry>> = HashMap::new();
    for module in modules {
        for (verb, func) in module.handlers() {
            let Some(canonical) = vocabulary.canonical_registration(verb) else {
                return Err(Error::handler_without_verb(
                    verb.to_string(),
                    module.name().to_string(),
                ));
            };
            let chain = chains.entry(canonical.clone()).or_default();
            if let Some(previous) = chain.iter().find(|e| e.origin == module.origin()) {
                return Err(Error::duplicate_handler(
                    canonical.to_string(),
                    previous.module.to_string(),
                    module.name().to_string(),
                ));
            }
            chain.push(HandlerEntry {
                module: module.name().clone(),
                origin: module.origin(),
                func: *func,
            });
        }
    }
    Ok(chains)
}

fn merge_reactions(
    modules: &[Module],
) -> Result<HashMap<Arc<str>, HashMap<Arc<str>, ReactionFn>>> {
    let mut reactions: HashMap<Arc<str>, HashMap<Arc<str>, ReactionFn>> = HashMap::new();
    for module in modules {
        let per_module = reactions.entry(module.name().clone()).or_default();
        for (event, func) in module.reactions() {
            if per_module.insert(event.clone(), *func).is_some() {
                return Err(Error::duplicate_reaction(
                    event.to_string(),
                    module.name().to_string(),
                ));
            }
        }
    }
    Ok(reactions)
}

type HookTable = HashMap<Arc<str>, HookDefinition>;

fn merge_hooks(modules: &[Module]) -> Result<(HookTable, Vec<PhaseEntry>)> {
    // First declaration fixes a hook's position; an overlay override
    // replaces the definition in place so tie-breaking stays stable.
    let mut order: Vec<Arc<str>> = Vec::new();
    let mut owners: HashMap<Arc<str>, (HookDefinition, Arc<str>, OriginClass)> = HashMap::new();
    let mut phase_fns: HashMap<Arc<str>, PhaseFn> = HashMap::new();

    for module in modules {
        for definition in module.hooks() {
            definition.validate()?;
            let name = definition.name().clone();
            if let Some((_, owner, origin)) = owners.get(&name) {
                if *origin == module.origin() {
                    return Err(Error::duplicate_hook(
                        name.to_string(),
                        owner.to_string(),
                        module.name().to_string(),
                    ));
                }
            } else {
                order.push(name.clone());
            }
            owners.insert(
                name,
                (definition.clone(), module.name().clone(), module.origin()),
            );
        }
        for (name, func) in module.phases() {
            phase_fns.insert(name.clone(), *func);
        }
    }

    // Dependency references must exist and stay within one kind.
    for name in &order {
        let (definition, _, _) = &owners[name];
        for dependency in definition.after() {
            let Some((target, _, _)) = owners.get(dependency) else {
                return Err(Error::unknown_hook_dependency(
                    definition.name().to_string(),
                    dependency.to_string(),
                ));
            };
            if target.kind() != definition.kind() {
                return Err(Error::hook_dependency_kind(
                    definition.name().to_string(),
                    dependency.to_string(),
                ));
            }
        }
    }

    let records: Vec<(Arc<str>, Vec<Arc<str>>)> = order
        .iter()
        .filter(|name| owners[*name].0.kind() == HookKind::TurnPhase)
        .map(|name| (name.clone(), owners[name].0.after().to_vec()))
        .collect();
    let schedule = topological_order(&records)?;

    let mut phases = Vec::with_capacity(schedule.len());
    for index in schedule {
        let name = records[index].0.clone();
        let (_, owner, _) = &owners[&name];
        let Some(func) = phase_fns.get(&name) else {
            return Err(Error::internal(format!(
                "turn phase {name:?} has no registered function"
            )));
        };
        phases.push(PhaseEntry {
            name,
            module: owner.clone(),
            func: *func,
        });
    }

    let hooks = owners
        .into_iter()
        .map(|(name, (definition, _, _))| (name, definition))
        .collect();
    Ok((hooks, phases))
}

// =============================================================================
// Module Registry
// =============================================================================

/// The finalized, read-only view of every registered module.
#[derive(Clone, Debug)]
pub struct ModuleRegistry {
    module_names: Vec<Arc<str>>,
    module_set: HashSet<Arc<str>>,
    vocabulary: MergedVocabulary,
    handlers: HashMap<Arc<str>, Vec<HandlerEntry>>,
    reactions: HashMap<Arc<str>, HashMap<Arc<str>, ReactionFn>>,
    hooks: HookTable,
    phases: Vec<PhaseEntry>,
}

impl ModuleRegistry {
    /// Returns the merged vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &MergedVocabulary {
        &self.vocabulary
    }

    /// Returns a canonical verb's handler chain, oldest first.
    ///
    /// The last entry is the active handler; earlier entries are reachable
    /// only through delegation.
    #[must_use]
    pub fn handler_chain(&self, canonical: &str) -> Option<&[HandlerEntry]> {
        self.handlers.get(canonical).map(Vec::as_slice)
    }

    /// Resolves a surface word to the handler a command would run.
    ///
    /// Canonicalizes through the merged vocabulary, so synonyms and
    /// overlay rebindings land on the same handler as dispatch. Returns
    /// the last entry of the override chain, the active one.
    #[must_use]
    pub fn resolve_handler(&self, verb: &str) -> Option<&HandlerEntry> {
        let entry = self.vocabulary.resolve(verb)?;
        self.handler_chain(entry.word())?.last()
    }

    /// Looks up one module's reaction for an event.
    #[must_use]
    pub fn reaction(&self, module: &str, event: &str) -> Option<ReactionFn> {
        self.reactions.get(module)?.get(event).copied()
    }

    /// Lists every module's reaction for an event, in load order.
    ///
    /// Gating walks a single entity's behaviors list instead; this global
    /// view answers "who reacts to this event at all" for diagnostics.
    #[must_use]
    pub fn resolve_reactions(&self, event: &str) -> Vec<ReactionEntry> {
        self.module_names
            .iter()
            .filter_map(|module| {
                self.reaction(module, event).map(|func| ReactionEntry {
                    module: module.clone(),
                    func,
                })
            })
            .collect()
    }

    /// Looks up a hook definition by name.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<&HookDefinition> {
        self.hooks.get(name)
    }

    /// Returns whether a name is a registered hook.
    #[must_use]
    pub fn is_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Returns the turn phases in scheduled order.
    #[must_use]
    pub fn turn_phases(&self) -> &[PhaseEntry] {
        &self.phases
    }

    /// Returns whether a module is registered.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.module_set.contains(name)
    }

    /// Returns module names in load order.
    #[must_use]
    pub fn module_names(&self) -> &[Arc<str>] {
        &self.module_names
    }

    /// Suggests the nearest registered module name, if any is close.
    #[must_use]
    pub fn suggest_module(&self, name: &str) -> Option<String> {
        self.module_names
            .iter()
            .map(|m| (strsim::levenshtein(name, m), m))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, m)| m.to_string())
    }

    /// Checks every entity's behaviors list against registered modules.
    ///
    /// # Errors
    ///
    /// Returns an error when a behaviors entry names an unregistered module
    /// (with a spelling suggestion when one is close) or names a hook
    /// instead of a module.
    pub fn validate_world(&self, world: &World) -> Result<()> {
        for entity in world.entities() {
            for behavior in entity.behaviors().iter() {
                if self.has_module(behavior) {
                    continue;
                }
                if self.is_hook(behavior) {
                    return Err(Error::behavior_names_hook(
                        entity.id().clone(),
                        behavior.to_string(),
                    ));
                }
                return Err(Error::unknown_behavior(
                    entity.id().clone(),
                    behavior.to_string(),
                    self.suggest_module(behavior),
                ));
            }
        }
        Ok(())
    }
}
