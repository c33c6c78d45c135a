use image::{RgbaImage, imageops};

use crate::foundation::core::{PixelRect, Size};

/// Raster surface the stack composes into.
///
/// Screens receive the destination canvas and return a frame of the same size; the compositor
/// only needs size queries, cropping and pasting.
pub trait Surface: Clone + Send + Sync + 'static {
    /// Surface dimensions.
    fn size(&self) -> Size;

    /// Copy out `rect`. Parts of `rect` outside the surface are dropped, so the result may be
    /// smaller than requested (or empty).
    fn crop(&self, rect: PixelRect) -> Self;

    /// Paste `src` with its top-left corner at `(x, y)`. Pixels falling outside `self` are
    /// clipped.
    fn paste(&mut self, src: &Self, x: u32, y: u32);
}

impl Surface for RgbaImage {
    fn size(&self) -> Size {
        let (width, height) = self.dimensions();
        Size::new(width, height)
    }

    fn crop(&self, rect: PixelRect) -> Self {
        let r = rect.clip_to(Surface::size(self));
        imageops::crop_imm(self, r.x, r.y, r.width, r.height).to_image()
    }

    fn paste(&mut self, src: &Self, x: u32, y: u32) {
        imageops::replace(self, src, i64::from(x), i64::from(y));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
