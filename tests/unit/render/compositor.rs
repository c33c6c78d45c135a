use super::*;
use crate::stack::screen::{Entry, Screen};
use crate::stack::state::Transition;
use image::{Rgba, RgbaImage};

const W: u32 = 10;
const H: u32 = 2;

/// Paints a column-index gradient with a per-screen tag in the green channel.
struct Tagged(u8);

impl Screen<RgbaImage> for Tagged {
    fn render(&self, canvas: &RgbaImage) -> RgbaImage {
        RgbaImage::from_fn(canvas.width(), canvas.height(), |x, _| {
            Rgba([x as u8, self.0, 0, 255])
        })
    }
}

fn canvas() -> RgbaImage {
    RgbaImage::from_pixel(W, H, Rgba([1, 2, 3, 4]))
}

fn state(tags: &[u8], transition: Transition) -> StackState<RgbaImage> {
    let entries = tags
        .iter()
        .map(|&t| Entry::new(Box::new(Tagged(t)) as Box<dyn Screen<RgbaImage>>))
        .collect();
    let mut s = StackState::new(entries, Some(W));
    s.transition = transition;
    s
}

#[test]
fn empty_stack_returns_canvas_unchanged() {
    let out = compose(&state(&[], Transition::Idle), canvas());
    assert_eq!(out, canvas());
}

#[test]
fn idle_returns_top_frame() {
    let out = compose(&state(&[10, 20], Transition::Idle), canvas());
    assert_eq!(out, Tagged(20).render(&canvas()));
}

#[test]
fn single_screen_slides_over_canvas() {
    let out = compose(&state(&[10], Transition::Pushing { offset: 4 }), canvas());
    // left 4 columns still show the canvas
    for x in 0..4 {
        assert_eq!(out.get_pixel(x, 0), &Rgba([1, 2, 3, 4]));
    }
    // the remaining 6 columns show the first 6 columns of the screen
    for x in 4..W {
        assert_eq!(out.get_pixel(x, 1), &Rgba([(x - 4) as u8, 10, 0, 255]));
    }
}

#[test]
fn two_screens_slide_over_background() {
    let out = compose(
        &state(
            &[10, 20],
            Transition::Popping {
                offset: 3,
                elements: 1,
            },
        ),
        canvas(),
    );
    assert_eq!(out.get_pixel(0, 0), &Rgba([0, 10, 0, 255]));
    assert_eq!(out.get_pixel(2, 0), &Rgba([2, 10, 0, 255]));
    assert_eq!(out.get_pixel(3, 0), &Rgba([0, 20, 0, 255]));
    assert_eq!(out.get_pixel(9, 1), &Rgba([6, 20, 0, 255]));
}

#[test]
fn zero_offset_shows_full_foreground() {
    let out = compose(&state(&[10, 20], Transition::Pushing { offset: 0 }), canvas());
    assert_eq!(out, Tagged(20).render(&canvas()));
}

#[test]
fn offset_past_width_shows_only_background() {
    let out = compose(
        &state(
            &[10, 20, 30],
            Transition::Popping {
                offset: 2 * W - 5,
                elements: 2,
            },
        ),
        canvas(),
    );
    assert_eq!(out, Tagged(20).render(&canvas()));
}
