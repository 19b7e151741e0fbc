//! Actuator Command Wire Protocol
//!
//! This crate defines the serial protocol between the hand-tracking host
//! and the actuator controller (an ESP32/PCA9685 servo bank or similar).
//! The protocol is deliberately minimal: plain ASCII, fire-and-forget, no
//! checksum and no acknowledgment.
//!
//! # Protocol Overview
//!
//! One frame per control-loop iteration:
//! ```text
//! <thumb>,<index>,<middle>,<ring>,<pinky>\n
//! ```
//!
//! Each value is a base-10, non-negative integer angle in degrees. The
//! controller applies the five values to its five actuator channels in
//! fixed positional order. A fresher frame always supersedes an older one,
//! so a lost frame needs no recovery.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod parser;

pub use frame::{Command, FrameError, WireFrame, CHANNEL_COUNT, MAX_FRAME_SIZE};
pub use parser::{LineParser, ParseError};

/// Canonical baud rate of the actuator link
pub const DEFAULT_BAUD: u32 = 115_200;
