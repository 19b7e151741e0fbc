//! Per-frame step limiting
//!
//! Bounds how far any channel may move between consecutive frames, so one
//! noisy detection cannot command a large instantaneous actuator jump.

use crate::channel::AngleVector;

/// Default maximum step per frame (degrees)
pub const DEFAULT_MAX_STEP_DEG: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    max_step: f32,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEP_DEG)
    }
}

impl RateLimiter {
    /// Create a limiter; `f32::INFINITY` disables limiting
    ///
    /// Negative or NaN steps act as 0 (hold).
    pub fn new(max_step: f32) -> Self {
        Self {
            max_step: max_step.max(0.0),
        }
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }

    pub fn limit(&self, previous: &AngleVector, proposed: &AngleVector) -> AngleVector {
        let step = self.max_step;
        proposed.zip_map(previous, |next, prev| {
            let delta = next - prev;
            if delta.abs() <= step {
                next
            } else {
                prev + delta.clamp(-step, step)
            }
        })
    }
}
