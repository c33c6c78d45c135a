use crate::foundation::core::PixelRect;
use crate::render::surface::Surface;
use crate::stack::state::StackState;

/// Compose the frame for `state` onto `canvas`.
///
/// The top screen is always rendered. Outside a transition it is the whole frame. During a
/// transition its rightmost `offset` columns are cut off and the rest is pasted flush right,
/// over the screen beneath it (or over `canvas` when it is the only screen). Push and pop share
/// this path; only the direction `offset` moves in differs.
pub(crate) fn compose<S: Surface>(state: &StackState<S>, canvas: S) -> S {
    let Some(top) = state.entries.last() else {
        return canvas;
    };

    let foreground = top.screen.render(&canvas);
    let Some(offset) = state.transition.offset() else {
        return foreground;
    };

    let size = canvas.size();
    let visible = size.width.saturating_sub(offset);
    let cropped = foreground.crop(PixelRect::new(0, 0, visible, size.height));
    let x = size.width.saturating_sub(cropped.size().width);

    let mut base = match state.entries.len().checked_sub(2) {
        Some(below) => state.entries[below].screen.render(&canvas),
        None => canvas,
    };
    base.paste(&cropped, x, 0);
    base
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
