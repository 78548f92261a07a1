//! End-to-end tests over the full stack: registry, engine, and session.

mod determinism;
mod gameplay;
mod halting;
