//! Host configuration
//!
//! One TOML file holds the serial settings, the detector settings and the
//! pipeline tuning. An embedded default is used when no file is given.

mod loader;

pub use loader::{load, load_default, HostConfig};
