//! Internal test modules - whitebox tests with crate access
//!
//! Tests here drive the whole shell (key bindings, controller, surface and
//! drawing) through the acceptance harness, or check controller invariants
//! over generated event sequences.
