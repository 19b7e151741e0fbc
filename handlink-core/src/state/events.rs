//! Events that trigger state transitions

use crate::landmarks::Landmarks;

/// Per-frame detection outcome
///
/// Both variants are ordinary inputs; a missing hand is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Detector reported a hand this frame
    HandDetected,
    /// Detector reported no hand this frame
    HandMissing,
}

impl FrameEvent {
    /// Event for a detector result
    pub fn from_detection(detection: Option<&Landmarks>) -> Self {
        match detection {
            Some(_) => FrameEvent::HandDetected,
            None => FrameEvent::HandMissing,
        }
    }
}
