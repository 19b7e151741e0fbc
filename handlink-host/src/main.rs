//! Handlink host
//!
//! Reads hand landmarks from a detector, turns them into five actuator
//! angles and streams them to the controller as ASCII frames.

mod config;
mod runner;
mod source;
mod transport;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use handlink_hal::SerialTx;
use tracing::{info, warn};

use crate::config::HostConfig;
use crate::runner::{RunSummary, Runner, Shutdown, StopReason};
use crate::source::{DetectorProcess, JsonLinesSource, LandmarkSource};
use crate::transport::{open_serial, DryRun};

#[derive(Parser, Debug)]
#[command(name = "handlink", version, about = "Hand pose to actuator angle bridge")]
struct Args {
    /// Configuration file (TOML); the embedded default is used if omitted
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serial device, overriding the configuration
    #[arg(long, short, value_name = "DEVICE")]
    port: Option<String>,

    /// Baud rate, overriding the configuration
    #[arg(long)]
    baud: Option<u32>,

    /// Log frames instead of opening the serial port
    #[arg(long)]
    dry_run: bool,

    /// Print every commanded pose to stdout
    #[arg(long)]
    print_angles: bool,

    /// Detector command; detector JSON is read from stdin if omitted
    #[arg(last = true, value_name = "DETECTOR")]
    detector: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(
        alpha = config.pipeline.filter.alpha,
        max_step_deg = config.pipeline.filter.max_step_deg,
        policy = ?config.pipeline.lost_policy,
        "pipeline configured"
    );

    let shutdown = Shutdown::new();
    let detector = if args.detector.is_empty() {
        config.source.command.clone()
    } else {
        args.detector.clone()
    };

    let source: Box<dyn LandmarkSource> = if detector.is_empty() {
        info!("reading detector output from stdin");
        Box::new(JsonLinesSource::new(io::stdin().lock(), config.source.min_confidence))
    } else {
        let process = DetectorProcess::spawn(&detector, config.source.min_confidence)?;
        watch_operator_quit(shutdown.clone());
        Box::new(process)
    };

    let summary = if args.dry_run {
        info!("dry run, frames are logged only");
        run(&config, source, DryRun::new(), shutdown, args.print_angles)
    } else {
        let serial = &config.serial;
        let device = open_serial(
            &serial.port,
            &serial.line_config(),
            serial.write_timeout(),
            &serial.retry_policy(),
        )
        .map_err(|e| anyhow!("{}: {e}", serial.port))?;
        // Opening the port resets some controllers
        thread::sleep(config.serial.settle());
        run(&config, source, device, shutdown, args.print_angles)
    };

    info!(
        frames = summary.frames,
        tracked = summary.tracked_frames,
        sent = summary.sent,
        dropped = summary.dropped,
        withheld = summary.withheld,
        "stopped: {}",
        summary.reason
    );

    match summary.reason {
        StopReason::Quit | StopReason::EndOfStream => Ok(()),
        StopReason::SourceFailed | StopReason::Disconnected => {
            Err(anyhow!("stopped early: {}", summary.reason))
        }
    }
}

fn load_config(args: &Args) -> Result<HostConfig> {
    let mut config = match &args.config {
        Some(path) => config::load(path)?,
        None => config::load_default().context("embedded default configuration")?,
    };

    if let Some(port) = &args.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = args.baud {
        config.serial.baud = baud;
    }
    config.validate()?;
    Ok(config)
}

fn run<T: SerialTx>(
    config: &HostConfig,
    source: Box<dyn LandmarkSource>,
    tx: T,
    shutdown: Shutdown,
    print_angles: bool,
) -> RunSummary {
    Runner::new(&config.pipeline, source, tx, shutdown)
        .print_angles(print_angles)
        .run()
}

/// Stop when the operator types `q` on stdin
fn watch_operator_quit(shutdown: Shutdown) {
    let spawned = thread::Builder::new()
        .name("operator-quit".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                        info!("quit requested");
                        shutdown.request();
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "operator quit watcher unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_detector_after_separator() {
        let args = Args::parse_from(["handlink", "--dry-run", "--", "python3", "detect.py", "--camera", "1"]);
        assert!(args.dry_run);
        assert_eq!(args.detector, ["python3", "detect.py", "--camera", "1"]);
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from(["handlink", "--port", "/dev/ttyACM0", "--baud", "57600"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud, 57_600);
    }

    #[test]
    fn test_zero_baud_override_rejected() {
        let args = Args::parse_from(["handlink", "--baud", "0"]);
        assert!(load_config(&args).is_err());
    }
}
