use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::animation::steps::{StepOpts, Steps};
use crate::render::surface::Surface;
use crate::stack::state::{StackState, Transition};

/// State cell shared between the controller, the renderer and the driver.
pub(crate) type SharedState<S> = Arc<RwLock<StackState<S>>>;

// A panicking screen must not wedge navigation, so poisoned locks are recovered.
pub(crate) fn read<S: Surface>(
    state: &RwLock<StackState<S>>,
) -> RwLockReadGuard<'_, StackState<S>> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<S: Surface>(
    state: &RwLock<StackState<S>>,
) -> RwLockWriteGuard<'_, StackState<S>> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Cooperative cancellation flag shared by a stack and its drivers.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which transition a driver animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DriveKind {
    Push,
    Pop { elements: usize },
}

/// How a driver run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DriveOutcome {
    /// Terminal state committed.
    Committed,
    /// Cancellation observed; nothing committed.
    Cancelled,
}

/// Background task advancing one transition.
pub(crate) struct Driver<S: Surface> {
    pub(crate) state: SharedState<S>,
    pub(crate) cancel: CancelToken,
    /// Width captured when the transition was set up; slide distances derive from it.
    pub(crate) width: Option<u32>,
    pub(crate) duration: Duration,
    pub(crate) step_opts: StepOpts,
}

impl<S: Surface> Driver<S> {
    /// Animate `kind` to completion or cancellation.
    ///
    /// Cancellation is checked under the write lock before every update, including the final
    /// commit, so once a canceller has taken the lock after setting the token no further write
    /// happens. A width change on the stack after setup does not affect a running slide.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn run(self, kind: DriveKind) -> DriveOutcome {
        match self.width.filter(|&w| w > 0) {
            Some(width) => {
                let distance = match kind {
                    DriveKind::Push => width,
                    DriveKind::Pop { elements } => {
                        width.saturating_mul(u32::try_from(elements).unwrap_or(u32::MAX))
                    }
                };
                for step in Steps::with_opts(distance, self.duration, self.step_opts) {
                    let mut st = write(&self.state);
                    if self.cancel.is_cancelled() {
                        tracing::debug!(component = "driver", "cancelled mid-transition");
                        return DriveOutcome::Cancelled;
                    }
                    st.transition = advance(st.transition, step, distance);
                    tracing::trace!(component = "driver", step, transition = ?st.transition);
                }
            }
            None => {
                tracing::debug!(
                    component = "driver",
                    "width unknown, committing without animation"
                );
            }
        }
        self.commit(kind)
    }

    fn commit(&self, kind: DriveKind) -> DriveOutcome {
        let evicted = {
            let mut st = write(&self.state);
            if self.cancel.is_cancelled() {
                tracing::debug!(component = "driver", "cancelled before commit");
                return DriveOutcome::Cancelled;
            }
            let evicted = match kind {
                DriveKind::Push => Vec::new(),
                DriveKind::Pop { elements } => st.split_top(elements),
            };
            st.transition = Transition::Idle;
            evicted
        };

        for entry in evicted {
            let id = entry.id;
            // a panicking screen must not skip the teardown of the ones below it
            if std::panic::catch_unwind(AssertUnwindSafe(move || entry.teardown())).is_err() {
                tracing::error!(component = "driver", %id, "screen teardown panicked");
            }
        }
        tracing::debug!(component = "driver", ?kind, "transition committed");
        DriveOutcome::Committed
    }
}

/// Move `transition` one step toward its end, never past `[0, distance]`.
pub(crate) fn advance(transition: Transition, step: u32, distance: u32) -> Transition {
    match transition {
        Transition::Idle => Transition::Idle,
        Transition::Pushing { offset } => Transition::Pushing {
            offset: offset.saturating_sub(step),
        },
        Transition::Popping { offset, elements } => Transition::Popping {
            offset: offset.saturating_add(step).min(distance.max(offset)),
            elements,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/driver.rs"]
mod tests;
