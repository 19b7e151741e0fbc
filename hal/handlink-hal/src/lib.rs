//! Handlink Hardware Abstraction Layer
//!
//! This crate defines the transport traits the control loop talks to, so the
//! same pipeline can drive a real serial port, a dry-run sink, or a test
//! double.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (handlink-host runner)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  handlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ serial device │       │    dry run    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Contents
//!
//! - [`serial::SerialTx`] - best-effort frame transmission
//! - [`acquire::acquire`] - bounded-retry transport acquisition

#![no_std]
#![deny(unsafe_code)]

pub mod acquire;
pub mod serial;

// Re-export key items at crate root for convenience
pub use acquire::{acquire, AcquireError, RetryPolicy};
pub use serial::{
    send_best_effort, DataBits, Parity, SendOutcome, SerialConfig, SerialTx, StopBits, TxError,
    TxErrorKind,
};
