use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::surface::Surface;

/// Process-wide counter for screen identifiers.
static SCREEN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a screen owned by a [`crate::ScreenStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u64);

impl ScreenId {
    pub(crate) fn next() -> Self {
        Self(SCREEN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identifier value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

/// A renderable page held by the stack.
///
/// `render` may be called from the rendering thread at any time, including while a transition
/// driver is running on the pool; `teardown` runs exactly once, after the screen has left the
/// stack for good.
pub trait Screen<S: Surface>: Send + Sync {
    /// Produce a frame the size of `canvas`.
    fn render(&self, canvas: &S) -> S;

    /// Release resources held by the screen.
    fn teardown(&mut self) {}

    /// Short label used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Owned screen plus its identifier.
pub(crate) struct Entry<S: Surface> {
    pub(crate) id: ScreenId,
    pub(crate) screen: Box<dyn Screen<S>>,
}

impl<S: Surface> Entry<S> {
    pub(crate) fn new(screen: Box<dyn Screen<S>>) -> Self {
        Self {
            id: ScreenId::next(),
            screen,
        }
    }

    pub(crate) fn teardown(mut self) {
        tracing::debug!(
            component = "stack",
            id = %self.id,
            screen = self.screen.name(),
            "teardown"
        );
        self.screen.teardown();
    }
}

impl<S: Surface> std::fmt::Debug for Entry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("screen", &self.screen.name())
            .finish()
    }
}
