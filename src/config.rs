use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::animation::ease::Ease;
use crate::animation::steps::{DEFAULT_MAX_FPS, StepOpts};
use crate::foundation::error::{StackError, StackResult};

/// Tunables for a [`crate::ScreenStack`].
///
/// Every field has a default, so a JSON document only needs the keys it overrides:
///
/// ```json
/// { "transition_duration_secs": 0.4, "ease": "out_cubic", "width": 128 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    /// Length of a push or pop slide, in seconds.
    pub transition_duration_secs: f64,
    /// Maximum slide steps per second.
    pub max_fps: u32,
    /// Slide progress curve.
    pub ease: Ease,
    /// Display width in pixels, if known up front. Otherwise it is learned from the first canvas
    /// passed to `render`.
    pub width: Option<u32>,
    /// Threads in the driver pool. `None` means one.
    pub driver_threads: Option<usize>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            transition_duration_secs: 0.25,
            max_fps: DEFAULT_MAX_FPS,
            ease: Ease::Linear,
            width: None,
            driver_threads: None,
        }
    }
}

impl StackConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> StackResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StackError::config(format!("open stack config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            StackError::config(format!("parse stack config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> StackResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| StackError::config(format!("parse stack config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    pub fn validate(&self) -> StackResult<()> {
        let d = self.transition_duration_secs;
        if !d.is_finite() || d < 0.0 {
            return Err(StackError::config(
                "transition_duration_secs must be finite and >= 0",
            ));
        }
        if Duration::try_from_secs_f64(d).is_err() {
            return Err(StackError::config("transition_duration_secs is out of range"));
        }
        if self.max_fps == 0 {
            return Err(StackError::config("max_fps must be >= 1"));
        }
        if self.width == Some(0) {
            return Err(StackError::config("width must be >= 1 when set"));
        }
        if self.driver_threads == Some(0) {
            return Err(StackError::config("driver_threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// Slide duration. Invalid values (rejected by [`StackConfig::validate`]) map to zero.
    pub fn transition_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.transition_duration_secs).unwrap_or(Duration::ZERO)
    }

    /// Step sequencing options derived from this config.
    pub fn step_opts(&self) -> StepOpts {
        StepOpts {
            max_fps: self.max_fps,
            ease: self.ease,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
