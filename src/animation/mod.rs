//! Transition pacing.

/// Easing curves.
pub mod ease;
/// Paced pixel-step sequences.
pub mod steps;
