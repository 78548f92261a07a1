//! Core types, values, mutation paths, and persistent collections for Fable.
//!
//! This crate provides:
//! - [`Value`] - Dynamic property values with structural sharing
//! - [`FbVec`] / [`FbMap`] - Persistent collection wrappers
//! - [`EntityId`] - String entity identifiers
//! - [`MutationPath`] / [`Changes`] - Parsed path mutations and their application
//! - [`Command`] - The parsed-command shape handed in by front ends
//! - [`HandlerResult`] / [`EventResult`] / [`UpdateResult`] - Gameplay outcomes
//! - [`Error`] - The loud error tier

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod command;
pub mod entity_id;
pub mod error;
pub mod path;
pub mod result;
pub mod value;

pub use collections::{FbMap, FbVec};
pub use command::Command;
pub use entity_id::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use path::{Changes, MutationPath, PathOp, apply_mutation, read_path};
pub use result::{EventResult, HandlerResult, UpdateResult};
pub use value::{PropMap, Value};
