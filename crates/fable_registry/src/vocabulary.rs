//! Verb vocabulary: per-module declarations and the merged surface map.
//!
//! Modules declare verbs with optional synonyms, a gating event, and an
//! object-required flag. At finalize time all declarations fold into one
//! [`MergedVocabulary`] mapping every surface word to its canonical verb.
//! Two modules of the same origin class may not bind one surface word
//! divergently; an overlay module silently rebinds base words.

use std::collections::HashMap;
use std::sync::Arc;

use fable_foundation::{Error, Result};

use crate::module::{Module, OriginClass};

// =============================================================================
// Verb Entry
// =============================================================================

/// One verb as a module declares it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbEntry {
    word: Arc<str>,
    synonyms: Vec<Arc<str>>,
    event: Option<Arc<str>>,
    object_required: bool,
}

impl VerbEntry {
    /// Creates a verb entry for the given canonical word.
    #[must_use]
    pub fn new(word: impl Into<Arc<str>>) -> Self {
        Self {
            word: word.into(),
            synonyms: Vec::new(),
            event: None,
            object_required: false,
        }
    }

    /// Adds a synonym resolving to this verb.
    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<Arc<str>>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }

    /// Sets the entity event this verb raises when it mutates the world.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<Arc<str>>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Marks this verb as requiring a target object.
    #[must_use]
    pub const fn with_object_required(mut self) -> Self {
        self.object_required = true;
        self
    }

    /// Returns the canonical word.
    #[must_use]
    pub fn word(&self) -> &Arc<str> {
        &self.word
    }

    /// Returns the declared synonyms.
    #[must_use]
    pub fn synonyms(&self) -> &[Arc<str>] {
        &self.synonyms
    }

    /// Returns the gating event name, if the verb declares one.
    #[must_use]
    pub fn event(&self) -> Option<&Arc<str>> {
        self.event.as_ref()
    }

    /// Returns whether dispatch refuses commands lacking an object.
    #[must_use]
    pub const fn object_required(&self) -> bool {
        self.object_required
    }

    /// Checks the entry for well-formedness.
    pub(crate) fn validate(&self, module: &str) -> Result<()> {
        if self.word.is_empty() || self.word.contains(char::is_whitespace) {
            return Err(Error::malformed_vocabulary(
                module,
                format!("verb word {:?} is empty or contains whitespace", self.word),
            ));
        }
        let mut surfaces = vec![&self.word];
        for synonym in &self.synonyms {
            if synonym.is_empty() || synonym.contains(char::is_whitespace) {
                return Err(Error::malformed_vocabulary(
                    module,
                    format!("synonym {synonym:?} is empty or contains whitespace"),
                ));
            }
            if surfaces.contains(&synonym) {
                return Err(Error::malformed_vocabulary(
                    module,
                    format!("surface word {synonym:?} repeats within the entry"),
                ));
            }
            surfaces.push(synonym);
        }
        if let Some(event) = &self.event {
            if !event.starts_with("on_") {
                return Err(Error::malformed_vocabulary(
                    module,
                    format!("event {event:?} must use the on_ prefix"),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Merged Vocabulary
// =============================================================================

/// Where a surface word currently points.
#[derive(Clone, Debug)]
struct Binding {
    canonical: Arc<str>,
    module: Arc<str>,
    origin: OriginClass,
}

/// The union of all module vocabularies, keyed by surface word.
#[derive(Clone, Debug, Default)]
pub struct MergedVocabulary {
    bindings: HashMap<Arc<str>, Binding>,
    verbs: HashMap<Arc<str>, VerbEntry>,
}

impl MergedVocabulary {
    /// Folds module vocabularies into one surface map.
    ///
    /// Expects modules in load order: base class before overlay class, so a
    /// later binding that crosses classes is always an overlay override.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed entries, for one module binding a
    /// surface word twice, and for two same-class modules binding a surface
    /// word divergently.
    pub(crate) fn merge(modules: &[Module]) -> Result<Self> {
        let mut merged = Self::default();
        for module in modules {
            for entry in module.vocabulary() {
                entry.validate(module.name())?;
                merged.bind(
                    entry.word().clone(),
                    entry,
                    module.name().clone(),
                    module.origin(),
                )?;
                for synonym in entry.synonyms() {
                    merged.bind(
                        synonym.clone(),
                        entry,
                        module.name().clone(),
                        module.origin(),
                    )?;
                }
            }
        }
        Ok(merged)
    }

    fn bind(
        &mut self,
        word: Arc<str>,
        entry: &VerbEntry,
        module: Arc<str>,
        origin: OriginClass,
    ) -> Result<()> {
        let canonical = entry.word().clone();
        if let Some(existing) = self.bindings.get(&word) {
            if existing.origin == origin {
                if existing.canonical == canonical
                    && self.verbs.get(&canonical) == Some(entry)
                {
                    // Identical redeclaration; nothing diverges.
                    return Ok(());
                }
                if existing.module == module {
                    return Err(Error::malformed_vocabulary(
                        module.to_string(),
                        format!("surface word {word:?} is bound twice"),
                    ));
                }
                return Err(Error::vocabulary_conflict(
                    word.to_string(),
                    existing.module.to_string(),
                    module.to_string(),
                ));
            }
            // Later origin class wins outright.
        }
        self.bindings.insert(
            word,
            Binding {
                canonical: canonical.clone(),
                module,
                origin,
            },
        );
        self.verbs.insert(canonical, entry.clone());
        Ok(())
    }

    /// Resolves a surface word to its verb entry.
    #[must_use]
    pub fn resolve(&self, word: &str) -> Option<&VerbEntry> {
        let binding = self.bindings.get(word)?;
        self.verbs.get(&binding.canonical)
    }

    /// Canonicalizes a verb word for handler registration.
    ///
    /// A word that is itself a canonical verb wins over its surface binding,
    /// so a module's handler stays attached to the module's own verb even
    /// when an overlay captures the surface word for a different verb.
    pub(crate) fn canonical_registration(&self, word: &str) -> Option<Arc<str>> {
        if let Some((key, _)) = self.verbs.get_key_value(word) {
            return Some(key.clone());
        }
        self.bindings.get(word).map(|b| b.canonical.clone())
    }

    /// Iterates all recognized surface words.
    pub fn words(&self) -> impl Iterator<Item = &Arc<str>> {
        self.bindings.keys()
    }

    /// Returns the number of surface words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether no surface word is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
