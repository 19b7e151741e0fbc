//! Control loop
//!
//! Owns the state threaded between frames and runs the per-frame pipeline:
//! curl extraction, angle mapping, smoothing and rate limiting. When the
//! hand is lost the last commanded pose is held, never reset to neutral,
//! so the actuators freeze instead of snapping on a transient dropout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{AngleVector, CurlVector};
use crate::config::PipelineConfig;
use crate::filter::{RateLimiter, Smoother};
use crate::finger::CurlExtractor;
use crate::landmarks::Landmarks;
use crate::mapping::AngleMapper;
use crate::state::{FrameEvent, TrackingStatus};

/// What to transmit while the hand is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LostPolicy {
    /// Keep sending the held pose every frame
    #[default]
    Hold,
    /// Send nothing until tracking resumes
    Silent,
}

/// State carried from one frame to the next
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Last commanded pose
    pub previous_angles: AngleVector,
    pub status: TrackingStatus,
    /// Frames processed with a hand in view
    pub tracked_frames: u64,
}

impl ControlState {
    /// Lost, holding the neutral pose
    pub fn new(neutral: AngleVector) -> Self {
        Self {
            previous_angles: neutral,
            status: TrackingStatus::Lost,
            tracked_frames: 0,
        }
    }
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOutput {
    /// Pose to command this frame
    pub angles: AngleVector,
    pub status: TrackingStatus,
    /// Status differs from the previous frame
    pub status_changed: bool,
    /// Extracted curl, when a hand was seen
    pub curls: Option<CurlVector>,
    /// Unfiltered mapped angles, when a hand was seen
    pub target: Option<AngleVector>,
}

impl ControlOutput {
    /// Check if this frame's angles go on the wire
    pub fn should_transmit(&self, policy: LostPolicy) -> bool {
        match (self.status, policy) {
            (TrackingStatus::Tracking, _) => true,
            (TrackingStatus::Lost, LostPolicy::Hold) => true,
            (TrackingStatus::Lost, LostPolicy::Silent) => false,
        }
    }
}

/// Per-frame pose-to-angle pipeline
#[derive(Debug, Clone)]
pub struct ControlLoop {
    extractor: CurlExtractor,
    mapper: AngleMapper,
    smoother: Smoother,
    limiter: RateLimiter,
    state: ControlState,
}

impl ControlLoop {
    /// Build from a validated configuration
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            extractor: CurlExtractor::new(config.hand_model()),
            mapper: AngleMapper::new(config.angle_config()),
            smoother: Smoother::new(config.filter.alpha),
            limiter: RateLimiter::new(config.filter.max_step_deg),
            state: ControlState::new(config.neutral_deg),
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Process one frame's detector result
    pub fn step(&mut self, detection: Option<&Landmarks>) -> ControlOutput {
        let event = FrameEvent::from_detection(detection);
        let previous_status = self.state.status;
        self.state.status = previous_status.transition(event);

        let (curls, target) = match detection {
            Some(landmarks) => {
                let curls = self.extractor.extract(landmarks);
                let target = self.mapper.map(&curls);
                let previous = self.state.previous_angles;
                let smoothed = self.smoother.smooth(&target, &previous);
                self.state.previous_angles = self.limiter.limit(&previous, &smoothed);
                self.state.tracked_frames += 1;
                (Some(curls), Some(target))
            }
            None => (None, None),
        };

        ControlOutput {
            angles: self.state.previous_angles,
            status: self.state.status,
            status_changed: self.state.status != previous_status,
            curls,
            target,
        }
    }
}
