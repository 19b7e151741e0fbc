//! Hand keypoints produced by the external landmark detector
//!
//! One [`Landmarks`] value holds the 21 keypoints of a single hand for a
//! single frame, addressed by the joint indices in [`joints`] (MediaPipe
//! hand landmark convention).

use thiserror::Error;

/// Number of keypoints per hand
pub const LANDMARK_COUNT: usize = 21;

/// Joint indices (MediaPipe hand landmark model convention)
pub mod joints {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Landmark construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
}

/// A single keypoint
///
/// `x`/`y` are in frame pixels (or normalized `[0, 1]`), `z` is relative
/// depth and is not used by the curl metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane
    pub fn distance_2d(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// All keypoints of one detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: [Point; LANDMARK_COUNT],
}

impl Landmarks {
    pub const fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a detector's point list, which must hold exactly 21 points
    pub fn from_slice(points: &[Point]) -> Result<Self, LandmarkError> {
        let points: [Point; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(Self { points })
    }

    /// Keypoint at a joint index
    ///
    /// # Panics
    /// If `joint >= LANDMARK_COUNT`.
    pub fn point(&self, joint: usize) -> &Point {
        &self.points[joint]
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    /// Image-plane distance between two joints
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].distance_2d(&self.points[b])
    }

    /// Scale x and y independently, e.g. normalized coordinates to pixels
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            points: self.points.map(|p| Point::new(p.x * sx, p.y * sy, p.z)),
        }
    }
}
