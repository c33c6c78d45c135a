//! Frame composition.

pub(crate) mod compositor;
/// Raster surface abstraction.
pub mod surface;
