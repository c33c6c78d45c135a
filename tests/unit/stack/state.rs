use super::*;
use crate::stack::screen::Screen;
use image::RgbaImage;

struct Blank;

impl Screen<RgbaImage> for Blank {
    fn render(&self, canvas: &RgbaImage) -> RgbaImage {
        canvas.clone()
    }
}

fn state(n: usize) -> StackState<RgbaImage> {
    let entries = (0..n)
        .map(|_| Entry::<RgbaImage>::new(Box::new(Blank)))
        .collect();
    StackState::new(entries, Some(32))
}

#[test]
fn offset_and_elements_follow_variant() {
    assert_eq!(Transition::Idle.offset(), None);
    assert_eq!(Transition::Pushing { offset: 7 }.offset(), Some(7));
    let pop = Transition::Popping {
        offset: 3,
        elements: 2,
    };
    assert_eq!(pop.offset(), Some(3));
    assert_eq!(pop.elements_to_pop(), 2);
    assert_eq!(Transition::Pushing { offset: 7 }.elements_to_pop(), 0);
    assert!(Transition::default().is_idle());
}

#[test]
fn active_is_top_when_idle() {
    let s = state(3);
    assert_eq!(s.active_index(), Some(2));
    assert_eq!(s.active_id(), Some(s.entries[2].id));
}

#[test]
fn active_skips_departing_screens() {
    let mut s = state(3);
    s.transition = Transition::Popping {
        offset: 0,
        elements: 2,
    };
    assert_eq!(s.active_index(), Some(0));

    s.transition = Transition::Popping {
        offset: 0,
        elements: 3,
    };
    assert_eq!(s.active_index(), None);
}

#[test]
fn active_on_empty_is_absent() {
    assert_eq!(state(0).active_index(), None);
    assert_eq!(state(0).active_id(), None);
}

#[test]
fn split_top_returns_top_first() {
    let mut s = state(4);
    let ids = s.ids();
    let evicted = s.split_top(2);
    assert_eq!(evicted.iter().map(|e| e.id).collect::<Vec<_>>(), vec![ids[3], ids[2]]);
    assert_eq!(s.ids(), ids[..2].to_vec());
}
