//! Curl to mechanical angle mapping

use crate::channel::{AngleVector, CurlVector, CHANNEL_COUNT};

/// Mechanical range of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleLimits {
    /// Angle commanded at curl 0 (curl 1 when inverted)
    pub min_deg: f32,
    /// Angle commanded at curl 1 (curl 0 when inverted)
    pub max_deg: f32,
    /// Actuator moves opposite to finger flexion
    pub invert: bool,
}

impl AngleLimits {
    pub const fn new(min_deg: f32, max_deg: f32, invert: bool) -> Self {
        Self {
            min_deg,
            max_deg,
            invert,
        }
    }

    /// Angle for a curl value
    ///
    /// The endpoints land exactly on `min_deg`/`max_deg`; the final clamp
    /// absorbs floating-point overshoot in between.
    pub fn angle_for(&self, curl: f32) -> f32 {
        let c = if self.invert { 1.0 - curl } else { curl };
        let angle = self.min_deg * (1.0 - c) + self.max_deg * c;
        angle.clamp(self.min_deg, self.max_deg)
    }

    pub fn contains(&self, angle: f32) -> bool {
        (self.min_deg..=self.max_deg).contains(&angle)
    }
}

/// Limits for every channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleConfig {
    pub channels: [AngleLimits; CHANNEL_COUNT],
}

impl AngleConfig {
    pub const fn new(channels: [AngleLimits; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }
}

/// Maps curl vectors to angle vectors
#[derive(Debug, Clone)]
pub struct AngleMapper {
    config: AngleConfig,
}

impl AngleMapper {
    pub fn new(config: AngleConfig) -> Self {
        Self { config }
    }

    pub fn map(&self, curls: &CurlVector) -> AngleVector {
        let mut angles = [0.0; CHANNEL_COUNT];
        for (i, (angle, limits)) in angles.iter_mut().zip(self.config.channels.iter()).enumerate() {
            *angle = limits.angle_for(curls.values()[i]);
        }
        AngleVector::new(angles)
    }
}
