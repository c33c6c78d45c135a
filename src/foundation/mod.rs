//! Shared primitives: geometry and the crate error type.

/// Pixel geometry.
pub mod core;
/// Error type for the crate's fallible boundaries.
pub mod error;
