//! Configuration types
//!
//! Process-wide pipeline configuration. Built once at startup, validated,
//! then only ever read.

pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::*;
