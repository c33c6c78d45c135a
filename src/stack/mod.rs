//! The screen stack: state machine, transition driver and shared state.

/// Public navigation surface.
pub mod controller;
/// Background transition task and cancellation.
pub mod driver;
/// Screen capability and identifiers.
pub mod screen;
/// Transition state and the shared state cell.
pub mod state;
