//! Finger geometry and curl extraction
//!
//! Converts one frame's keypoints into a continuous per-finger flexion
//! metric using self-normalised distance ratios, so no per-user
//! calibration is needed.

pub mod curl;
pub mod model;

pub use curl::{CurlExtractor, DISTANCE_EPSILON};
pub use model::{CurlWindow, FingerSpec, HandModel, ThumbSpec};
