//! Configuration type definitions
//!
//! The tuning constants (curl windows, smoothing factor, step limit) were
//! chosen empirically for one camera and one actuator build. They live here
//! as named fields so a different setup only needs a config change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::channel::{AngleVector, Channel, CHANNEL_COUNT};
use crate::control::LostPolicy;
use crate::filter::rate_limit::DEFAULT_MAX_STEP_DEG;
use crate::filter::smoother::DEFAULT_ALPHA;
use crate::finger::{CurlWindow, HandModel};
use crate::mapping::{AngleConfig, AngleLimits};

use super::error::ConfigError;

/// Largest angle the wire format can carry
pub const MAX_ANGLE_DEG: f32 = u16::MAX as f32;

/// Neutral pose angle (mid-range of a 0..180 servo)
pub const DEFAULT_NEUTRAL_DEG: f32 = 90.0;

/// Default mechanical range
pub const DEFAULT_MIN_DEG: f32 = 0.0;
pub const DEFAULT_MAX_DEG: f32 = 180.0;

/// Thumb tip to index MCP over palm length: open at 0.90, closed at 0.35
pub const DEFAULT_THUMB_WINDOW: CurlWindow = CurlWindow::new(0.90, 0.35);

/// Finger tip to MCP over proximal segment: open at 3.5, closed at 1.8
pub const DEFAULT_FINGER_WINDOW: CurlWindow = CurlWindow::new(3.5, 1.8);

/// Thumb, middle and pinky servos are mounted reversed on the reference build
pub const DEFAULT_INVERT: [bool; CHANNEL_COUNT] = [true, false, true, false, true];

/// One value per channel, addressed by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelTable<T> {
    pub thumb: T,
    pub index: T,
    pub middle: T,
    pub ring: T,
    pub pinky: T,
}

impl<T> ChannelTable<T> {
    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::Thumb => &self.thumb,
            Channel::Index => &self.index,
            Channel::Middle => &self.middle,
            Channel::Ring => &self.ring,
            Channel::Pinky => &self.pinky,
        }
    }

    /// Iterate in channel order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Project every entry, keeping channel order
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> [U; CHANNEL_COUNT] {
        Channel::ALL.map(|c| f(self.get(c)))
    }
}

/// Per-channel mechanical range and curl window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ChannelConfig {
    /// Angle at curl 0 (curl 1 if inverted)
    pub min_deg: f32,
    /// Angle at curl 1 (curl 0 if inverted)
    pub max_deg: f32,
    /// Reverse the actuator direction
    #[cfg_attr(feature = "serde", serde(default))]
    pub invert: bool,
    /// Distance ratio at full extension
    pub far: f32,
    /// Distance ratio at full flexion
    pub near: f32,
}

impl ChannelConfig {
    const fn with_window(window: CurlWindow, invert: bool) -> Self {
        Self {
            min_deg: DEFAULT_MIN_DEG,
            max_deg: DEFAULT_MAX_DEG,
            invert,
            far: window.far,
            near: window.near,
        }
    }

    /// Default thumb channel
    pub const fn thumb(invert: bool) -> Self {
        Self::with_window(DEFAULT_THUMB_WINDOW, invert)
    }

    /// Default non-thumb channel
    pub const fn finger(invert: bool) -> Self {
        Self::with_window(DEFAULT_FINGER_WINDOW, invert)
    }

    pub fn limits(&self) -> AngleLimits {
        AngleLimits::new(self.min_deg, self.max_deg, self.invert)
    }

    pub fn window(&self) -> CurlWindow {
        CurlWindow::new(self.far, self.near)
    }
}

/// Temporal filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct FilterConfig {
    /// EMA weight of the newest target, in (0, 1]
    pub alpha: f32,
    /// Largest change per channel per frame (degrees); `inf` disables
    pub max_step_deg: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            max_step_deg: DEFAULT_MAX_STEP_DEG,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    /// Pose commanded before the first detection
    pub neutral_deg: AngleVector,
    /// Whether the held pose is transmitted while the hand is lost
    pub lost_policy: LostPolicy,
    /// Channels left out keep their defaults
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_channels"))]
    pub channels: ChannelTable<ChannelConfig>,
}

#[cfg(feature = "serde")]
fn deserialize_channels<'de, D>(deserializer: D) -> Result<ChannelTable<ChannelConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct Partial {
        thumb: Option<ChannelConfig>,
        index: Option<ChannelConfig>,
        middle: Option<ChannelConfig>,
        ring: Option<ChannelConfig>,
        pinky: Option<ChannelConfig>,
    }

    let partial = Partial::deserialize(deserializer)?;
    let defaults = PipelineConfig::default().channels;
    Ok(ChannelTable {
        thumb: partial.thumb.unwrap_or(defaults.thumb),
        index: partial.index.unwrap_or(defaults.index),
        middle: partial.middle.unwrap_or(defaults.middle),
        ring: partial.ring.unwrap_or(defaults.ring),
        pinky: partial.pinky.unwrap_or(defaults.pinky),
    })
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let [thumb, index, middle, ring, pinky] = DEFAULT_INVERT;
        Self {
            filter: FilterConfig::default(),
            neutral_deg: AngleVector::splat(DEFAULT_NEUTRAL_DEG),
            lost_policy: LostPolicy::default(),
            channels: ChannelTable {
                thumb: ChannelConfig::thumb(thumb),
                index: ChannelConfig::finger(index),
                middle: ChannelConfig::finger(middle),
                ring: ChannelConfig::finger(ring),
                pinky: ChannelConfig::finger(pinky),
            },
        }
    }
}

impl PipelineConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.filter.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha(alpha));
        }

        let step = self.filter.max_step_deg;
        if !(step > 0.0) {
            return Err(ConfigError::InvalidMaxStep(step));
        }

        for (channel, cfg) in self.channels.iter() {
            let range_ok = cfg.min_deg.is_finite()
                && cfg.max_deg.is_finite()
                && cfg.min_deg >= 0.0
                && cfg.min_deg <= cfg.max_deg
                && cfg.max_deg <= MAX_ANGLE_DEG;
            if !range_ok {
                return Err(ConfigError::InvalidLimits {
                    channel,
                    min_deg: cfg.min_deg,
                    max_deg: cfg.max_deg,
                });
            }

            if !(cfg.far.is_finite() && cfg.near > 0.0 && cfg.far > cfg.near) {
                return Err(ConfigError::InvalidWindow {
                    channel,
                    far: cfg.far,
                    near: cfg.near,
                });
            }

            let neutral = self.neutral_deg[channel];
            if !cfg.limits().contains(neutral) {
                return Err(ConfigError::NeutralOutOfRange {
                    channel,
                    value: neutral,
                    min_deg: cfg.min_deg,
                    max_deg: cfg.max_deg,
                });
            }
        }

        Ok(())
    }

    /// Mechanical limits in channel order
    pub fn angle_config(&self) -> AngleConfig {
        AngleConfig::new(self.channels.map(ChannelConfig::limits))
    }

    /// Finger descriptors with the configured windows
    pub fn hand_model(&self) -> HandModel {
        HandModel::new(self.channels.map(ChannelConfig::window))
    }
}
