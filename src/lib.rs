//! Screenstack is a navigable stack of screens for small raster displays.
//!
//! Screens are pushed and popped with a slide animation driven in the background; the renderer
//! can ask for a frame at any moment and gets a correctly composed partial slide:
//!
//! - Build a [`ScreenStack`] from a [`StackConfig`]
//! - [`ScreenStack::push`] / [`ScreenStack::pop`] screens implementing [`Screen`]
//! - Call [`ScreenStack::render`] from the render loop
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Easing and step pacing.
pub mod animation;
/// Stack configuration.
pub mod config;
/// Frame composition and the surface abstraction.
pub mod render;
/// Screen stack state machine.
pub mod stack;

pub use crate::animation::ease::Ease;
pub use crate::animation::steps::{StepOpts, StepPlan, Steps, steps};
pub use crate::config::StackConfig;
pub use crate::foundation::core::{PixelRect, Size};
pub use crate::foundation::error::{StackError, StackResult};
pub use crate::render::surface::Surface;
pub use crate::stack::controller::ScreenStack;
pub use crate::stack::driver::CancelToken;
pub use crate::stack::screen::{Screen, ScreenId};
pub use crate::stack::state::Transition;
