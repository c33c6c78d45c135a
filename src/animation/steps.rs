//! Step sequencing for slide transitions.
//!
//! A transition of `distance` pixels over `duration` is cut into at most `max_fps * duration`
//! frames (and never more frames than pixels). Frame `i` of `n` lands on the eased position
//! `round(distance * ease(i / n))`; increments that round to zero are folded into the next frame,
//! so every emitted value is positive and the values sum to `distance`.

use std::time::{Duration, Instant};

use crate::animation::ease::Ease;

/// Default cap on emitted steps per second.
pub const DEFAULT_MAX_FPS: u32 = 30;

/// Shape and rate options for a step sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOpts {
    /// Maximum number of steps emitted per second of transition time.
    pub max_fps: u32,
    /// Progress curve.
    pub ease: Ease,
}

impl Default for StepOpts {
    fn default() -> Self {
        Self {
            max_fps: DEFAULT_MAX_FPS,
            ease: Ease::Linear,
        }
    }
}

/// Number of frames a transition is split into.
pub fn frame_count(distance: u32, duration: Duration, max_fps: u32) -> u32 {
    if distance == 0 {
        return 0;
    }
    let wanted = (duration.as_secs_f64() * f64::from(max_fps.max(1))).round();
    // `as` saturates for out-of-range floats.
    (wanted as u32).clamp(1, distance)
}

/// Unpaced increments of a transition.
///
/// This is the pure part of [`Steps`]: it yields exactly the same values, immediately.
#[derive(Clone, Debug)]
pub struct StepPlan {
    distance: u32,
    frames: u32,
    ease: Ease,
    frame: u32,
    position: u32,
}

impl StepPlan {
    /// Plan `distance` pixels over `frames` frames.
    pub fn new(distance: u32, frames: u32, ease: Ease) -> Self {
        Self {
            distance,
            frames: if distance == 0 { 0 } else { frames.max(1) },
            ease,
            frame: 0,
            position: 0,
        }
    }

    /// Total number of frames in the plan.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Index (1-based) of the frame the last emitted increment belongs to; 0 before the first.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Pixels emitted so far.
    pub fn position(&self) -> u32 {
        self.position
    }

    fn target(&self, frame: u32) -> u32 {
        if frame >= self.frames {
            return self.distance;
        }
        let t = f64::from(frame) / f64::from(self.frames);
        let eased = (f64::from(self.distance) * self.ease.apply(t)).round() as u32;
        eased.clamp(self.position, self.distance)
    }
}

impl Iterator for StepPlan {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.frame < self.frames {
            self.frame += 1;
            let target = self.target(self.frame);
            let inc = target - self.position;
            if inc > 0 {
                self.position = target;
                return Some(inc);
            }
        }
        None
    }
}

/// Real-time paced step sequence.
///
/// Each call to `next` blocks until the deadline of the frame it belongs to
/// (`start + frame * duration / frames`, where `start` is the first call), so a full iteration
/// takes roughly `duration` of wall-clock time. Restart by calling [`steps`] again, or clone a
/// sequence before it is consumed.
#[derive(Clone, Debug)]
pub struct Steps {
    plan: StepPlan,
    interval: Duration,
    start: Option<Instant>,
}

impl Steps {
    /// Paced sequence over `distance` pixels with explicit options.
    pub fn with_opts(distance: u32, duration: Duration, opts: StepOpts) -> Self {
        let frames = frame_count(distance, duration, opts.max_fps);
        let interval = if frames == 0 {
            Duration::ZERO
        } else {
            duration / frames
        };
        Self {
            plan: StepPlan::new(distance, frames, opts.ease),
            interval,
            start: None,
        }
    }

    /// Delay between consecutive frame deadlines.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The unpaced plan backing this sequence, from its current position.
    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }
}

impl Iterator for Steps {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let start = *self.start.get_or_insert_with(Instant::now);
        let inc = self.plan.next()?;
        if !self.interval.is_zero() {
            let deadline = start + self.interval * self.plan.frame();
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
        }
        Some(inc)
    }
}

/// Paced sequence of pixel increments summing to `distance` over roughly `duration`.
pub fn steps(distance: u32, duration: Duration) -> Steps {
    Steps::with_opts(distance, duration, StepOpts::default())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/steps.rs"]
mod tests;
