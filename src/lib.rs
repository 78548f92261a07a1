//! Fable - Extensibility and mutation core for turn-based interactive fiction
//!
//! This crate re-exports all layers of the Fable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: fable_runtime    - Session, REPL, CLI, demo content
//! Layer 3: fable_engine     - Dispatch, reactions, mutation, turn scheduling
//! Layer 2: fable_registry   - Module registration, vocabulary, hooks
//! Layer 1: fable_world      - Entities and immutable world snapshots
//! Layer 0: fable_foundation - Core types (Value, Changes, results, Error)
//! ```

pub use fable_engine as engine;
pub use fable_foundation as foundation;
pub use fable_registry as registry;
pub use fable_runtime as runtime;
pub use fable_world as world;
