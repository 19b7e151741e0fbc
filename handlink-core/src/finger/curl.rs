//! Curl extraction
//!
//! Every ratio is a distance divided by another distance on the same hand,
//! so the result does not change with hand size or camera distance.

use crate::channel::{CurlVector, CHANNEL_COUNT};
use crate::landmarks::Landmarks;

use super::model::{FingerSpec, HandModel, ThumbSpec};

/// Added to every ratio denominator so coincident keypoints cannot divide
/// by zero
pub const DISTANCE_EPSILON: f32 = 1e-6;

/// Converts keypoints into per-channel curl
#[derive(Debug, Clone)]
pub struct CurlExtractor {
    model: HandModel,
}

impl CurlExtractor {
    pub fn new(model: HandModel) -> Self {
        Self { model }
    }

    /// Curl for every channel, thumb first
    pub fn extract(&self, landmarks: &Landmarks) -> CurlVector {
        let mut curls = [0.0; CHANNEL_COUNT];
        curls[0] = thumb_curl(&self.model.thumb, landmarks);
        for (slot, finger) in curls[1..].iter_mut().zip(self.model.fingers.iter()) {
            *slot = finger_curl(finger, landmarks);
        }
        CurlVector::new(curls)
    }
}

fn ratio(numerator: f32, denominator: f32) -> f32 {
    numerator / (denominator + DISTANCE_EPSILON)
}

fn thumb_curl(thumb: &ThumbSpec, lm: &Landmarks) -> f32 {
    let palm = lm.distance(thumb.palm.0, thumb.palm.1);
    let d = ratio(lm.distance(thumb.tip, thumb.reference), palm);
    thumb.window.curl(d)
}

fn finger_curl(finger: &FingerSpec, lm: &Landmarks) -> f32 {
    let segment = lm.distance(finger.mcp, finger.pip);
    let d = ratio(lm.distance(finger.tip, finger.mcp), segment);
    finger.window.curl(d)
}
