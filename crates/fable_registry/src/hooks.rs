//! Hook definitions and the turn-phase ordering graph.
//!
//! Hooks share one namespace split by naming convention: `turn_` names are
//! turn phases scheduled once per turn, `on_` names are entity events
//! dispatched through behavior lists. The declared kind and the name prefix
//! must agree, which keeps "the kind is derivable from the name" true for
//! readers and tools.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::sync::Arc;

use fable_foundation::{Error, Result};

// =============================================================================
// Hook Kind
// =============================================================================

/// What sort of hook a definition names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs once per turn, in dependency order (`turn_` prefix).
    TurnPhase,
    /// Fires per entity through its behaviors list (`on_` prefix).
    Entity,
}

impl HookKind {
    /// Derives the kind from a hook name's prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.starts_with("turn_") {
            Some(Self::TurnPhase)
        } else if name.starts_with("on_") {
            Some(Self::Entity)
        } else {
            None
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnPhase => write!(f, "turn-phase"),
            Self::Entity => write!(f, "entity"),
        }
    }
}

// =============================================================================
// Hook Definition
// =============================================================================

/// A named hook with ordering constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookDefinition {
    name: Arc<str>,
    kind: HookKind,
    after: Vec<Arc<str>>,
}

impl HookDefinition {
    /// Creates a turn-phase hook definition.
    #[must_use]
    pub fn turn_phase(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: HookKind::TurnPhase,
            after: Vec::new(),
        }
    }

    /// Creates an entity hook definition.
    #[must_use]
    pub fn entity(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: HookKind::Entity,
            after: Vec::new(),
        }
    }

    /// Adds a hook this one must run after.
    #[must_use]
    pub fn with_after(mut self, dependency: impl Into<Arc<str>>) -> Self {
        self.after.push(dependency.into());
        self
    }

    /// Returns the hook name.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the hook kind.
    #[must_use]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns the names this hook runs after.
    #[must_use]
    pub fn after(&self) -> &[Arc<str>] {
        &self.after
    }

    /// Checks that the declared kind matches the name prefix.
    ///
    /// # Errors
    ///
    /// Returns a kind-mismatch error when the prefix implies a different
    /// kind, or no kind at all.
    pub fn validate(&self) -> Result<()> {
        match HookKind::from_name(&self.name) {
            Some(kind) if kind == self.kind => Ok(()),
            Some(kind) => Err(Error::hook_kind_mismatch(
                self.name.to_string(),
                self.kind.to_string(),
                kind.to_string(),
            )),
            None => Err(Error::hook_kind_mismatch(
                self.name.to_string(),
                self.kind.to_string(),
                "neither (no turn_/on_ prefix)",
            )),
        }
    }
}

// =============================================================================
// Topological Ordering
// =============================================================================

/// Orders hooks so every `after` dependency runs first.
///
/// Input is `(name, after)` pairs in declaration order; every `after` name
/// must refer to another input entry. Ties are broken by declaration order,
/// making the result total and stable across runs.
///
/// Returns indices into the input slice.
///
/// # Errors
///
/// Returns a cycle error naming the hooks along the cycle.
pub(crate) fn topological_order(records: &[(Arc<str>, Vec<Arc<str>>)]) -> Result<Vec<usize>> {
    let index_of: HashMap<&str, usize> = records
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (&**name, i))
        .collect();

    let mut indegree = vec![0usize; records.len()];
    let mut successors = vec![Vec::new(); records.len()];
    for (i, (_, after)) in records.iter().enumerate() {
        for dependency in after {
            let dep = index_of[&**dependency];
            indegree[i] += 1;
            successors[dep].push(i);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(records.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for &next in &successors[i] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < records.len() {
        return Err(Error::hook_dependency_cycle(cycle_path(records, &indegree)));
    }
    Ok(order)
}

/// Extracts one cycle from the unresolved remainder for the error message.
fn cycle_path(records: &[(Arc<str>, Vec<Arc<str>>)], indegree: &[usize]) -> Vec<String> {
    let index_of: HashMap<&str, usize> = records
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (&**name, i))
        .collect();
    let unresolved = |i: usize| indegree[i] > 0;

    let start = (0..records.len())
        .find(|&i| unresolved(i))
        .unwrap_or_default();
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut path: Vec<usize> = Vec::new();
    let mut current = start;
    loop {
        if let Some(&position) = seen.get(&current) {
            let mut names: Vec<String> = path[position..]
                .iter()
                .map(|&i| records[i].0.to_string())
                .collect();
            names.push(records[current].0.to_string());
            return names;
        }
        seen.insert(current, path.len());
        path.push(current);
        // Every unresolved hook has at least one unresolved dependency.
        current = records[current]
            .1
            .iter()
            .map(|dep| index_of[&**dep])
            .find(|&dep| unresolved(dep))
            .unwrap_or(current);
    }
}
