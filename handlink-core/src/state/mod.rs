//! Tracking state machine
//!
//! Decides what the control loop transmits. The machine is explicit,
//! finite, and deterministic: the next state is a pure function of the
//! current state and the frame's detection event.

pub mod events;
pub mod machine;

pub use events::FrameEvent;
pub use machine::TrackingStatus;
