//! TOML configuration loading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use handlink_core::{ConfigError, PipelineConfig};
use handlink_hal::{RetryPolicy, SerialConfig};
use handlink_protocol::DEFAULT_BAUD;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration shipped inside the binary
const DEFAULT_TOML: &str = include_str!("../../handlink.toml");

/// Keys allowed outside any table
///
/// The pipeline section is flattened into the top level, which serde cannot
/// check for unknown keys, so the document's own keys are checked here.
const TOP_LEVEL_KEYS: &[&str] = &[
    "serial",
    "source",
    "filter",
    "neutral_deg",
    "lost_policy",
    "channels",
];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown top-level key `{0}`")]
    UnknownKey(String),
    #[error(transparent)]
    Pipeline(#[from] ConfigError),
    #[error("serial: {0}")]
    Serial(&'static str),
    #[error("source: min_confidence must be within [0, 1], got {0}")]
    MinConfidence(f32),
}

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSection {
    pub port: String,
    pub baud: u32,
    /// Open attempts before giving up
    pub open_attempts: u8,
    /// Delay between open attempts (ms)
    pub open_backoff_ms: u64,
    /// Delay after opening, before the first frame (ms)
    pub settle_ms: u64,
    /// Longest a frame may wait for room in the output buffer (ms)
    pub write_timeout_ms: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            port: "/dev/ttyUSB0".into(),
            baud: DEFAULT_BAUD,
            open_attempts: retry.attempts,
            open_backoff_ms: retry.backoff.as_millis() as u64,
            settle_ms: 1500,
            write_timeout_ms: 10,
        }
    }
}

impl SerialSection {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.open_attempts, Duration::from_millis(self.open_backoff_ms))
    }

    pub fn line_config(&self) -> SerialConfig {
        SerialConfig::with_baud(self.baud)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Landmark source settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    /// Hands scored below this are treated as absent
    pub min_confidence: f32,
    /// Detector program and arguments; empty reads stdin
    pub command: Vec<String>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            command: Vec::new(),
        }
    }
}

/// Everything the host needs to run
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub serial: SerialSection,
    pub source: SourceSection,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), LoadError> {
        self.pipeline.validate()?;

        if self.serial.port.is_empty() {
            return Err(LoadError::Serial("port must not be empty"));
        }
        if self.serial.baud == 0 {
            return Err(LoadError::Serial("baud must be non-zero"));
        }
        if self.serial.open_attempts == 0 {
            return Err(LoadError::Serial("open_attempts must be at least 1"));
        }
        if self.serial.write_timeout_ms == 0 {
            return Err(LoadError::Serial("write_timeout_ms must be at least 1"));
        }

        let confidence = self.source.min_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(LoadError::MinConfidence(confidence));
        }

        Ok(())
    }
}

/// Parse and validate a TOML document
pub fn parse(text: &str) -> Result<HostConfig, LoadError> {
    let document: toml::Table = toml::from_str(text)?;
    if let Some(key) = document
        .keys()
        .find(|key| !TOP_LEVEL_KEYS.contains(&key.as_str()))
    {
        return Err(LoadError::UnknownKey(key.clone()));
    }

    let config: HostConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
pub fn load(path: &Path) -> Result<HostConfig, LoadError> {
    info!(path = %path.display(), "loading configuration");
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Load the embedded default configuration
pub fn load_default() -> Result<HostConfig, LoadError> {
    debug!("using embedded default configuration");
    parse(DEFAULT_TOML)
}
