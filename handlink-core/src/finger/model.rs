//! Static per-finger descriptors
//!
//! Which joints feed each channel's curl ratio, and the ratio window that
//! maps onto curl 0..1. Built once at startup and never mutated.

use crate::channel::CHANNEL_COUNT;
use crate::landmarks::joints;

/// Decreasing linear map from a distance ratio to a curl value
///
/// A ratio at or above `far` (finger extended) maps to 0; at or below
/// `near` (finger flexed) maps to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlWindow {
    /// Ratio at full extension
    pub far: f32,
    /// Ratio at full flexion
    pub near: f32,
}

impl CurlWindow {
    pub const fn new(far: f32, near: f32) -> Self {
        Self { far, near }
    }

    /// Curl in `[0, 1]` for a distance ratio
    pub fn curl(&self, ratio: f32) -> f32 {
        let span = self.far - self.near;
        if span.abs() <= f32::EPSILON {
            // Collapsed window degrades to a threshold
            return if ratio <= self.near { 1.0 } else { 0.0 };
        }
        ((self.far - ratio) / span).clamp(0.0, 1.0)
    }
}

/// Non-thumb finger: tip-to-MCP distance over the MCP-to-PIP segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerSpec {
    pub tip: usize,
    pub mcp: usize,
    pub pip: usize,
    pub window: CurlWindow,
}

/// Thumb: tip-to-index-MCP distance over a palm-length reference
///
/// The thumb flexes by rotating across the palm rather than hinging, so its
/// own segment lengths are not a stable scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbSpec {
    pub tip: usize,
    /// Index finger MCP
    pub reference: usize,
    /// Wrist and middle finger MCP
    pub palm: (usize, usize),
    pub window: CurlWindow,
}

/// Descriptors for all five channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandModel {
    pub thumb: ThumbSpec,
    /// Index, middle, ring, pinky
    pub fingers: [FingerSpec; CHANNEL_COUNT - 1],
}

impl HandModel {
    /// MediaPipe topology with the given windows in channel order
    pub fn new(windows: [CurlWindow; CHANNEL_COUNT]) -> Self {
        let [thumb, index, middle, ring, pinky] = windows;
        Self {
            thumb: ThumbSpec {
                tip: joints::THUMB_TIP,
                reference: joints::INDEX_MCP,
                palm: (joints::WRIST, joints::MIDDLE_MCP),
                window: thumb,
            },
            fingers: [
                FingerSpec {
                    tip: joints::INDEX_TIP,
                    mcp: joints::INDEX_MCP,
                    pip: joints::INDEX_PIP,
                    window: index,
                },
                FingerSpec {
                    tip: joints::MIDDLE_TIP,
                    mcp: joints::MIDDLE_MCP,
                    pip: joints::MIDDLE_PIP,
                    window: middle,
                },
                FingerSpec {
                    tip: joints::RING_TIP,
                    mcp: joints::RING_MCP,
                    pip: joints::RING_PIP,
                    window: ring,
                },
                FingerSpec {
                    tip: joints::PINKY_TIP,
                    mcp: joints::PINKY_MCP,
                    pip: joints::PINKY_PIP,
                    window: pinky,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_endpoints() {
        let w = CurlWindow::new(3.5, 1.8);
        assert_eq!(w.curl(3.5), 0.0);
        assert_eq!(w.curl(1.8), 1.0);
        assert_eq!(w.curl(10.0), 0.0);
        assert_eq!(w.curl(0.0), 1.0);
    }

    #[test]
    fn test_window_is_decreasing() {
        let w = CurlWindow::new(0.90, 0.35);
        let mid = w.curl(0.625);
        assert!((mid - 0.5).abs() < 1e-5);
        assert!(w.curl(0.5) > w.curl(0.8));
    }

    #[test]
    fn test_collapsed_window() {
        let w = CurlWindow::new(1.0, 1.0);
        assert_eq!(w.curl(0.9), 1.0);
        assert_eq!(w.curl(1.1), 0.0);
    }

    #[test]
    fn test_model_topology() {
        let model = HandModel::new([CurlWindow::new(0.9, 0.35); CHANNEL_COUNT]);
        assert_eq!(model.fingers.len() + 1, CHANNEL_COUNT);
        assert_eq!(model.thumb.reference, joints::INDEX_MCP);
        assert_eq!(model.thumb.palm, (joints::WRIST, joints::MIDDLE_MCP));
        assert_eq!(model.fingers[0].tip, joints::INDEX_TIP);
        assert_eq!(model.fingers[3].pip, joints::PINKY_PIP);
    }
}
