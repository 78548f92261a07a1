//! Module registration and the finalized registry for the Fable engine.
//!
//! Content arrives as [`Module`] values carrying vocabulary, handlers,
//! reactions, and hooks. A [`RegistryBuilder`] collects them, and
//! [`RegistryBuilder::finalize`] produces the immutable [`ModuleRegistry`]
//! the engine dispatches against: merged vocabulary, handler override
//! chains, reaction indexes, and the precomputed turn-phase schedule.
//!
//! The [`Accessor`] trait is declared here so module code can be written
//! against it while the engine crate supplies the implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod access;
pub mod hooks;
pub mod module;
pub mod registry;
pub mod vocabulary;

pub use access::{Accessor, EventContext, HandlerFn, PhaseFn, ReactionFn};
pub use hooks::{HookDefinition, HookKind};
pub use module::{Module, ModuleBuilder, OriginClass};
pub use registry::{HandlerEntry, ModuleRegistry, PhaseEntry, ReactionEntry, RegistryBuilder};
pub use vocabulary::{MergedVocabulary, VerbEntry};
