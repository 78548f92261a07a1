//! Integration tests for Layer 3: Engine
//!
//! Tests for command dispatch, delegation, reactions, gated mutation, and
//! turn scheduling.
