//! Entity and persistent world state storage for Fable.
//!
//! This crate provides:
//! - [`Entity`] - Identity, property map, and ordered behavior list
//! - [`World`] - Immutable world state with structural sharing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod world;

pub use entity::Entity;
pub use world::World;
