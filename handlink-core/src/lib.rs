//! Hardware-agnostic core logic for the hand-to-actuator pipeline
//!
//! This crate turns one frame of hand keypoints into one actuator command.
//! It contains no I/O:
//!
//! - Landmark storage and joint indices
//! - Finger curl extraction from keypoint geometry
//! - Curl to mechanical angle mapping
//! - Exponential smoothing and per-frame rate limiting
//! - Tracking state machine and the control loop that threads state
//!   between frames
//! - Wire command encoding
//! - Configuration type definitions and validation
//!
//! Per frame:
//!
//! ```text
//! Landmarks → CurlExtractor → AngleMapper → Smoother → RateLimiter → CommandEncoder
//! ```

#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod control;
pub mod encoder;
pub mod filter;
pub mod finger;
pub mod landmarks;
pub mod mapping;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{AngleVector, Channel, CurlVector, CHANNEL_COUNT};
pub use config::{ChannelConfig, ChannelTable, ConfigError, FilterConfig, PipelineConfig};
pub use control::{ControlLoop, ControlOutput, ControlState, LostPolicy};
pub use encoder::CommandEncoder;
pub use filter::{RateLimiter, Smoother};
pub use finger::{CurlExtractor, CurlWindow, HandModel};
pub use landmarks::{LandmarkError, Landmarks, Point};
pub use mapping::{AngleConfig, AngleLimits, AngleMapper};
pub use state::{FrameEvent, TrackingStatus};
