//! REPL and CLI for Fable.
//!
//! This crate provides:
//! - [`Session`] - A registry, a world, and a scheduler bound together
//! - [`Repl`] - Interactive read-eval-print loop
//! - [`demo`] - Built-in demonstration content for the CLI

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod demo;
pub mod editor;
pub mod repl;
pub mod session;

pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use session::Session;
