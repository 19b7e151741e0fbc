//! Actuator channels and the per-channel value vectors
//!
//! Channel order is fixed and matches the positional order of the wire
//! frame: thumb, index, middle, ring, pinky.

use core::fmt;
use core::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use handlink_protocol::CHANNEL_COUNT;

/// One independently controlled actuator axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Channel {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Channel {
    /// All channels in wire order
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Thumb,
        Channel::Index,
        Channel::Middle,
        Channel::Ring,
        Channel::Pinky,
    ];

    /// Position of this channel in a frame
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase channel name
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Thumb => "thumb",
            Channel::Index => "index",
            Channel::Middle => "middle",
            Channel::Ring => "ring",
            Channel::Pinky => "pinky",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-channel flexion, each value in `[0, 1]`
///
/// 0 is fully extended, 1 is fully flexed. The constructor clamps, so every
/// `CurlVector` in circulation satisfies the range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurlVector([f32; CHANNEL_COUNT]);

impl CurlVector {
    /// Create a curl vector, clamping each value into `[0, 1]`
    ///
    /// NaN becomes 0 (treated as extended).
    pub fn new(values: [f32; CHANNEL_COUNT]) -> Self {
        Self(values.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }))
    }

    /// Same curl on every channel
    pub fn splat(value: f32) -> Self {
        Self::new([value; CHANNEL_COUNT])
    }

    /// Raw values in channel order
    pub fn values(&self) -> &[f32; CHANNEL_COUNT] {
        &self.0
    }
}

impl Index<Channel> for CurlVector {
    type Output = f32;

    fn index(&self, channel: Channel) -> &f32 {
        &self.0[channel.index()]
    }
}

/// Commanded mechanical position, degrees per channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AngleVector(pub [f32; CHANNEL_COUNT]);

impl AngleVector {
    /// Create an angle vector
    pub const fn new(values: [f32; CHANNEL_COUNT]) -> Self {
        Self(values)
    }

    /// Same angle on every channel
    pub const fn splat(value: f32) -> Self {
        Self([value; CHANNEL_COUNT])
    }

    /// Raw values in channel order
    pub fn values(&self) -> &[f32; CHANNEL_COUNT] {
        &self.0
    }

    /// Combine with another vector channel by channel
    pub fn zip_map(&self, other: &AngleVector, mut f: impl FnMut(f32, f32) -> f32) -> AngleVector {
        let mut out = [0.0; CHANNEL_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(self.0[i], other.0[i]);
        }
        AngleVector(out)
    }

    /// Largest per-channel absolute difference
    pub fn max_abs_diff(&self, other: &AngleVector) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

impl Index<Channel> for AngleVector {
    type Output = f32;

    fn index(&self, channel: Channel) -> &f32 {
        &self.0[channel.index()]
    }
}

impl fmt::Display for AngleVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{:3.0}", &channel.name()[..2], self.0[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_matches_wire() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
        assert_eq!(Channel::ALL.len(), CHANNEL_COUNT);
    }

    #[test]
    fn test_curl_vector_clamps() {
        let curls = CurlVector::new([-0.5, 0.25, 1.5, f32::NAN, 1.0]);
        assert_eq!(curls.values(), &[0.0, 0.25, 1.0, 0.0, 1.0]);
        assert_eq!(curls[Channel::Index], 0.25);
    }

    #[test]
    fn test_angle_display() {
        let angles = AngleVector::new([180.0, 0.0, 90.0, 45.0, 7.0]);
        assert_eq!(angles.to_string(), "th:180 in:  0 mi: 90 ri: 45 pi:  7");
    }

    #[test]
    fn test_max_abs_diff() {
        let a = AngleVector::splat(90.0);
        let b = AngleVector::new([90.0, 80.0, 95.0, 90.0, 90.0]);
        assert_eq!(a.max_abs_diff(&b), 10.0);
    }
}
