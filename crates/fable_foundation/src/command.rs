//! Parsed player commands.
//!
//! Fable does not parse text. A command arrives from whatever front end sits
//! above the core — a natural-language parser, a test, the REPL's whitespace
//! split — already resolved to a verb word, entity ids, and free-form
//! arguments.

use std::sync::Arc;

use crate::entity_id::EntityId;
use crate::value::{PropMap, Value};

/// A parsed command ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// The verb word as entered (canonical or synonym).
    pub verb: Arc<str>,
    /// The direct object, if the front end resolved one.
    pub object: Option<EntityId>,
    /// The indirect object ("with X", "to X"), if any.
    pub indirect_object: Option<EntityId>,
    /// Who issued the command.
    pub actor: EntityId,
    /// Free-form extras the front end wants handlers to see.
    pub args: PropMap,
}

impl Command {
    /// Creates a command with a verb and an actor.
    #[must_use]
    pub fn new(verb: impl Into<Arc<str>>, actor: impl Into<EntityId>) -> Self {
        Self {
            verb: verb.into(),
            object: None,
            indirect_object: None,
            actor: actor.into(),
            args: PropMap::new(),
        }
    }

    /// Sets the direct object.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<EntityId>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Sets the indirect object.
    #[must_use]
    pub fn with_indirect_object(mut self, object: impl Into<EntityId>) -> Self {
        self.indirect_object = Some(object.into());
        self
    }

    /// Adds a free-form argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.args = self.args.insert(key.into(), value.into());
        self
    }

    /// Looks up a free-form argument.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }
}
