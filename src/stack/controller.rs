use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::config::StackConfig;
use crate::foundation::error::{StackError, StackResult};
use crate::render::compositor::compose;
use crate::render::surface::Surface;
use crate::stack::driver::{CancelToken, DriveKind, Driver, SharedState, read, write};
use crate::stack::screen::{Entry, Screen, ScreenId};
use crate::stack::state::{StackState, Transition};

/// A navigable stack of screens with sliding push/pop transitions.
///
/// Navigation never fails: requests that cannot be honoured (a transition is already running,
/// the stack is too shallow, the stack was cleaned up) are dropped and logged at `debug` level.
/// Transitions run on a private driver pool; [`ScreenStack::render`] can be called at any time
/// and composes whatever state the driver last published.
pub struct ScreenStack<S: Surface = RgbaImage> {
    state: SharedState<S>,
    cancel: CancelToken,
    pool: rayon::ThreadPool,
    config: StackConfig,
}

impl<S: Surface> ScreenStack<S> {
    /// Create an empty stack.
    pub fn new(config: StackConfig) -> StackResult<Self> {
        Self::with_screens(config, Vec::new())
    }

    /// Create a stack holding `screens`, bottom first.
    pub fn with_screens(
        config: StackConfig,
        screens: Vec<Box<dyn Screen<S>>>,
    ) -> StackResult<Self> {
        config.validate()?;
        let pool = build_driver_pool(config.driver_threads)?;
        let entries = screens.into_iter().map(Entry::new).collect();
        Ok(Self {
            state: Arc::new(RwLock::new(StackState::new(entries, config.width))),
            cancel: CancelToken::new(),
            pool,
            config,
        })
    }

    /// Configuration this stack was built with.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Push the screen built by `factory`.
    ///
    /// Returns the new screen's id, or `None` when the push was rejected because a transition is
    /// in flight or the stack has been cleaned up. With `animate` the screen slides in from the
    /// right.
    pub fn push<F>(&self, factory: F, animate: bool) -> Option<ScreenId>
    where
        F: FnOnce() -> Box<dyn Screen<S>>,
    {
        if let Some(reason) = self.busy_reason(&read(&self.state)) {
            reject("push", reason);
            return None;
        }

        let entry = Entry::new(factory());
        let id = entry.id;

        let mut st = write(&self.state);
        // another thread may have started a transition while the factory ran
        if let Some(reason) = self.busy_reason(&st) {
            drop(st);
            reject("push", reason);
            entry.teardown();
            return None;
        }

        tracing::debug!(
            component = "stack",
            op = "push",
            %id,
            screen = entry.screen.name(),
            animate
        );
        st.entries.push(entry);
        if !animate {
            return Some(id);
        }

        let width = st.width;
        st.transition = Transition::Pushing {
            offset: width.unwrap_or(0),
        };
        drop(st);
        self.spawn_driver(DriveKind::Push, width);
        Some(id)
    }

    /// Pop the top `elements` screens.
    ///
    /// Rejected (and logged) while a transition is running, after cleanup, on an empty stack,
    /// when `elements` is 0, or when `elements` exceeds the stack depth. Without `animate` the
    /// screens are removed and torn down before this returns; otherwise they slide out to the
    /// right and are evicted when the slide completes.
    pub fn pop(&self, animate: bool, elements: usize) {
        let mut st = write(&self.state);
        if let Some(reason) = self.busy_reason(&st) {
            drop(st);
            reject("pop", reason);
            return;
        }
        if st.entries.is_empty() {
            drop(st);
            reject("pop", "stack is empty");
            return;
        }
        if elements == 0 {
            drop(st);
            reject("pop", "nothing to pop");
            return;
        }
        if elements > st.len() {
            let depth = st.len();
            drop(st);
            tracing::debug!(
                component = "stack",
                op = "pop",
                reason = "not enough screens",
                elements,
                depth,
                "rejected"
            );
            return;
        }

        if !animate {
            let evicted = st.split_top(elements);
            drop(st);
            tracing::debug!(component = "stack", op = "pop", elements, animate, "popping");
            for entry in evicted {
                entry.teardown();
            }
            return;
        }

        let width = st.width;
        st.transition = Transition::Popping {
            offset: 0,
            elements,
        };
        drop(st);
        tracing::debug!(component = "stack", op = "pop", elements, animate, "popping");
        self.spawn_driver(DriveKind::Pop { elements }, width);
    }

    /// Compose the current frame onto `canvas`.
    ///
    /// Returns `canvas` untouched when the stack is empty. The first canvas with a non-zero
    /// width fixes the stack width if none was configured.
    pub fn render(&self, canvas: S) -> S {
        let width = canvas.size().width;
        if width > 0 && read(&self.state).width.is_none() {
            let mut st = write(&self.state);
            if st.width.is_none() {
                st.width = Some(width);
            }
        }
        compose(&read(&self.state), canvas)
    }

    /// Id of the screen the user perceives as current.
    ///
    /// This is the top screen, except while popping, when it is the screen that will be on top
    /// once the pop commits.
    pub fn active_screen(&self) -> Option<ScreenId> {
        read(&self.state).active_id()
    }

    /// Position of [`ScreenStack::active_screen`] in the stack, bottom = 0.
    pub fn active_index(&self) -> Option<usize> {
        read(&self.state).active_index()
    }

    /// Ids of all screens, bottom first.
    pub fn stack(&self) -> Vec<ScreenId> {
        read(&self.state).ids()
    }

    /// Number of screens on the stack, including any still sliding out.
    pub fn len(&self) -> usize {
        read(&self.state).len()
    }

    /// Return `true` when the stack holds no screens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current transition snapshot.
    pub fn transition(&self) -> Transition {
        read(&self.state).transition
    }

    /// Return `true` while a pop is in flight.
    pub fn is_popping(&self) -> bool {
        matches!(self.transition(), Transition::Popping { .. })
    }

    /// Return `true` while any transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        !self.transition().is_idle()
    }

    /// Width used for slide distances, if known.
    pub fn width(&self) -> Option<u32> {
        read(&self.state).width
    }

    /// Set the width used for slide distances.
    ///
    /// A transition already running keeps the width it started with.
    pub fn set_width(&self, width: u32) {
        if width == 0 {
            reject("set_width", "zero width");
            return;
        }
        write(&self.state).width = Some(width);
    }

    /// Run `f` against the screen `id`, if it is still on the stack.
    ///
    /// The stack is read-locked while `f` runs; navigating from inside `f` deadlocks.
    pub fn with_screen<R>(&self, id: ScreenId, f: impl FnOnce(&dyn Screen<S>) -> R) -> Option<R> {
        let st = read(&self.state);
        let entry = st.entries.iter().find(|e| e.id == id)?;
        Some(f(entry.screen.as_ref()))
    }

    /// Cancel any running transition and stop accepting navigation.
    ///
    /// After this returns no driver writes to the stack again. A cancelled transition is left
    /// exactly where it stopped: a pop evicts nothing, a pushed screen stays on the stack. The
    /// remaining screens are torn down when the stack is dropped.
    pub fn cleanup(&self) {
        self.cancel.cancel();
        // Drivers check the token under the write lock; taking it once orders every later
        // driver check after the cancel.
        drop(write(&self.state));
        tracing::debug!(component = "stack", op = "cleanup", "transition driver cancelled");
    }

    /// Return `true` once [`ScreenStack::cleanup`] has been called.
    pub fn is_cleaned_up(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block until no transition is in flight or `timeout` elapses. Returns `true` when idle.
    ///
    /// A transition frozen by [`ScreenStack::cleanup`] never becomes idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_transitioning() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn busy_reason(&self, st: &StackState<S>) -> Option<&'static str> {
        if self.cancel.is_cancelled() {
            Some("stack cleaned up")
        } else if !st.transition.is_idle() {
            Some("transition in progress")
        } else {
            None
        }
    }

    fn spawn_driver(&self, kind: DriveKind, width: Option<u32>) {
        let driver = Driver {
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
            width,
            duration: self.config.transition_duration(),
            step_opts: self.config.step_opts(),
        };
        self.pool.spawn(move || {
            driver.run(kind);
        });
    }
}

impl<S: Surface> Drop for ScreenStack<S> {
    fn drop(&mut self) {
        self.cleanup();
        let mut entries = std::mem::take(&mut write(&self.state).entries);
        while let Some(entry) = entries.pop() {
            entry.teardown();
        }
    }
}

impl<S: Surface> std::fmt::Debug for ScreenStack<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = read(&self.state);
        f.debug_struct("ScreenStack")
            .field("entries", &st.entries)
            .field("transition", &st.transition)
            .field("width", &st.width)
            .field("cleaned_up", &self.cancel.is_cancelled())
            .finish()
    }
}

fn reject(op: &'static str, reason: &'static str) {
    tracing::debug!(component = "stack", op, reason, "rejected");
}

fn build_driver_pool(threads: Option<usize>) -> StackResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(1))
        .thread_name(|i| format!("screenstack-driver-{i}"))
        .panic_handler(log_driver_panic)
        .build()
        .map_err(|e| StackError::driver(format!("failed to build driver thread pool: {e}")))
}

// Without a handler rayon aborts the process when a spawned task panics.
fn log_driver_panic(payload: Box<dyn std::any::Any + Send>) {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>");
    tracing::error!(component = "driver", panic = message, "driver task panicked");
}

#[cfg(test)]
#[path = "../../tests/unit/stack/controller.rs"]
mod tests;
