//! State machine definition
//!
//! The control loop's output is a function of the current state and the
//! frame event. There is no terminal state; the loop runs until it is
//! shut down from outside.

use super::events::FrameEvent;

/// Tracking states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    /// No hand in view; the last commanded pose is held
    #[default]
    Lost,
    /// Hand in view; new commands follow the pose
    Tracking,
}

impl TrackingStatus {
    /// Check if new angles are being computed
    pub fn is_tracking(&self) -> bool {
        matches!(self, TrackingStatus::Tracking)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: FrameEvent) -> Self {
        use FrameEvent::*;
        use TrackingStatus::*;

        match (self, event) {
            (_, HandDetected) => Tracking,
            (_, HandMissing) => Lost,
        }
    }
}
