//! Configuration validation errors

use thiserror::Error;

use crate::channel::Channel;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("smoothing factor alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f32),
    #[error("max_step_deg must be greater than 0, got {0}")]
    InvalidMaxStep(f32),
    #[error("{channel}: invalid angle range {min_deg}..{max_deg} (need 0 <= min <= max <= 65535)")]
    InvalidLimits {
        channel: Channel,
        min_deg: f32,
        max_deg: f32,
    },
    #[error("{channel}: invalid curl window far={far} near={near} (need far > near > 0)")]
    InvalidWindow { channel: Channel, far: f32, near: f32 },
    #[error("{channel}: neutral angle {value} outside {min_deg}..{max_deg}")]
    NeutralOutOfRange {
        channel: Channel,
        value: f32,
        min_deg: f32,
        max_deg: f32,
    },
}
