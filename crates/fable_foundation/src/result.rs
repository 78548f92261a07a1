//! Outcome types for dispatch, reactions, and updates.
//!
//! These are the quiet tier of the error design: a refused verb, a vetoed
//! event, or a failed mutation is ordinary gameplay and travels as a value.
//! Code returns `Err` only for bugs and load-time problems, and panics only
//! on contract misuse.

use std::sync::Arc;

use crate::value::{PropMap, Value};

/// Outcome of dispatching a command to its handler chain.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerResult {
    /// Whether the command took effect.
    pub success: bool,
    /// Player-facing message for the narration layer to render.
    pub message: Option<String>,
    /// Structured data for narration and callers.
    pub data: PropMap,
}

impl HandlerResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            data: PropMap::new(),
        }
    }

    /// Creates a failed result with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: PropMap::new(),
        }
    }

    /// Creates the stock refusal for a verb no vocabulary declares.
    #[must_use]
    pub fn unknown_verb(verb: &str) -> Self {
        Self::failure(format!("Nothing here responds to {verb:?}."))
            .with_data("reason", "unknown-verb")
            .with_data("verb", verb)
    }

    /// Creates the stock refusal for a verb used without its required object.
    #[must_use]
    pub fn missing_target(verb: &str) -> Self {
        Self::failure(format!("{verb:?} needs a target."))
            .with_data("reason", "missing-target")
            .with_data("verb", verb)
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.data = self.data.insert(key.into(), value.into());
        self
    }
}

/// Outcome of one reaction, or of a combined reaction walk.
#[derive(Clone, Debug, PartialEq)]
pub struct EventResult {
    /// Whether the reacting side permits the event.
    pub allowed: bool,
    /// Message explaining the reaction, if any.
    pub message: Option<String>,
    /// Structured data contributed by the reaction.
    pub data: PropMap,
}

impl EventResult {
    /// Creates an allowing result.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            message: None,
            data: PropMap::new(),
        }
    }

    /// Creates a vetoing result with a message.
    #[must_use]
    pub fn veto(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            message: Some(message.into()),
            data: PropMap::new(),
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.data = self.data.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a gated update.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateResult {
    /// Whether every mutation applied.
    pub success: bool,
    /// Veto message, failure description, or nothing on clean success.
    pub message: Option<String>,
    /// Data merged from the reactions that allowed the update.
    pub data: PropMap,
}

impl UpdateResult {
    /// Prefix marking a partially applied update.
    ///
    /// When mutations fail after earlier ones in the same update already
    /// committed, the world no longer matches what the caller asked for and
    /// there is no rollback. The session layer must treat a message carrying
    /// this prefix as fatal.
    pub const INCONSISTENT_STATE_MARKER: &'static str = "[inconsistent-state]";

    /// Creates a successful result.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            data: PropMap::new(),
        }
    }

    /// Creates a failed result with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: PropMap::new(),
        }
    }

    /// Creates a failed result for a partially applied change set.
    #[must_use]
    pub fn inconsistent(detail: impl Into<String>) -> Self {
        Self::failure(format!(
            "{} {}",
            Self::INCONSISTENT_STATE_MARKER,
            detail.into()
        ))
    }

    /// Returns true if this result marks a partially applied update.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.starts_with(Self::INCONSISTENT_STATE_MARKER))
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.data = self.data.insert(key.into(), value.into());
        self
    }

    /// Merges reaction data into this result, later keys winning.
    #[must_use]
    pub fn with_merged_data(mut self, data: &PropMap) -> Self {
        self.data = self.data.union(data);
        self
    }
}
