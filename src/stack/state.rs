use crate::render::surface::Surface;
use crate::stack::screen::{Entry, ScreenId};

/// Animation phase of the stack.
///
/// `offset` is the number of columns cropped off the right of the top screen when composing:
/// a push slides from `width` down to 0, a pop slides from 0 up to `width * elements`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    /// No animation in flight.
    #[default]
    Idle,
    /// The top screen is sliding in.
    Pushing {
        /// Columns still hidden.
        offset: u32,
    },
    /// The top `elements` screens are sliding out.
    Popping {
        /// Columns slid out so far.
        offset: u32,
        /// Screens evicted when the pop commits.
        elements: usize,
    },
}

impl Transition {
    /// Return `true` when no transition is in flight.
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Compositing offset, or `None` when idle.
    pub fn offset(self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Pushing { offset } | Self::Popping { offset, .. } => Some(offset),
        }
    }

    /// Screens pending eviction; 0 unless popping.
    pub fn elements_to_pop(self) -> usize {
        match self {
            Self::Popping { elements, .. } => elements,
            _ => 0,
        }
    }
}

/// Everything the renderer and the driver share, updated as a unit.
pub(crate) struct StackState<S: Surface> {
    pub(crate) entries: Vec<Entry<S>>,
    pub(crate) transition: Transition,
    pub(crate) width: Option<u32>,
}

impl<S: Surface> StackState<S> {
    pub(crate) fn new(entries: Vec<Entry<S>>, width: Option<u32>) -> Self {
        Self {
            entries,
            transition: Transition::Idle,
            width,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index of the screen the user perceives as current.
    ///
    /// While popping, the departing screens are still on top of the stack, so the active one is
    /// `elements` below the top.
    pub(crate) fn active_index(&self) -> Option<usize> {
        let skip = self.transition.elements_to_pop();
        self.len().checked_sub(1)?.checked_sub(skip)
    }

    pub(crate) fn active_id(&self) -> Option<ScreenId> {
        self.active_index().map(|i| self.entries[i].id)
    }

    pub(crate) fn ids(&self) -> Vec<ScreenId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Remove the top `count` screens, returned top-first.
    pub(crate) fn split_top(&mut self, count: usize) -> Vec<Entry<S>> {
        let keep = self.len().saturating_sub(count);
        let mut evicted = self.entries.split_off(keep);
        evicted.reverse();
        evicted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/state.rs"]
mod tests;
