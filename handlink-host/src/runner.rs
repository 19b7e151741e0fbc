//! Frame loop
//!
//! Pulls one event from the landmark source per iteration, advances the
//! control loop, and pushes the resulting frame best-effort. A failed send
//! is logged and counted, never retried; only a disconnected transport or
//! a finished source stops the loop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handlink_core::{CommandEncoder, ControlLoop, ControlOutput, LostPolicy, PipelineConfig, TrackingStatus};
use handlink_hal::{send_best_effort, SendOutcome, SerialTx, TxErrorKind};
use tracing::{debug, error, info, warn};

use crate::source::{LandmarkSource, SourceEvent};

/// Cooperative stop flag shared with other threads
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Quit from the operator or the source
    Quit,
    /// Source ran out of frames
    EndOfStream,
    /// Source could not be read
    SourceFailed,
    /// Transport reported the link gone
    Disconnected,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Quit => write!(f, "quit requested"),
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::SourceFailed => write!(f, "source failed"),
            StopReason::Disconnected => write!(f, "transport disconnected"),
        }
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames consumed from the source
    pub frames: u64,
    /// Frames with a hand in view
    pub tracked_frames: u64,
    /// Frames written to the transport
    pub sent: u64,
    /// Frames the transport refused
    pub dropped: u64,
    /// Frames withheld by the lost policy
    pub withheld: u64,
    pub reason: StopReason,
}

/// Drives a source, the control loop and a transport
pub struct Runner<S, T> {
    source: S,
    tx: T,
    control: ControlLoop,
    lost_policy: LostPolicy,
    shutdown: Shutdown,
    print_angles: bool,
}

impl<S: LandmarkSource, T: SerialTx> Runner<S, T> {
    /// Build a runner; `config` must already be validated
    pub fn new(config: &PipelineConfig, source: S, tx: T, shutdown: Shutdown) -> Self {
        Self {
            source,
            tx,
            control: ControlLoop::new(config),
            lost_policy: config.lost_policy,
            shutdown,
            print_angles: false,
        }
    }

    /// Print each commanded pose to stdout
    pub fn print_angles(mut self, enabled: bool) -> Self {
        self.print_angles = enabled;
        self
    }

    /// Run until quit, end of stream or disconnect
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary {
            frames: 0,
            tracked_frames: 0,
            sent: 0,
            dropped: 0,
            withheld: 0,
            reason: StopReason::Quit,
        };

        summary.reason = loop {
            if self.shutdown.is_requested() {
                break StopReason::Quit;
            }

            let detection = match self.source.next_event() {
                Ok(SourceEvent::Frame(detection)) => detection,
                Ok(SourceEvent::Quit) => break StopReason::Quit,
                Ok(SourceEvent::EndOfStream) => break StopReason::EndOfStream,
                Err(e) => {
                    error!(error = %e, "landmark source failed");
                    break StopReason::SourceFailed;
                }
            };

            summary.frames += 1;
            let output = self.control.step(detection.as_ref());
            summary.tracked_frames = self.control.state().tracked_frames;
            self.report(&output);

            if !output.should_transmit(self.lost_policy) {
                summary.withheld += 1;
                continue;
            }

            let frame = match CommandEncoder::encode(&output.angles) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "frame encode failed");
                    summary.dropped += 1;
                    continue;
                }
            };

            match send_best_effort(&mut self.tx, frame.as_bytes()) {
                SendOutcome::Sent => summary.sent += 1,
                SendOutcome::Dropped(kind) => {
                    summary.dropped += 1;
                    warn!(%kind, frame = frame.as_str(), "frame dropped");
                    if kind == TxErrorKind::Disconnected {
                        break StopReason::Disconnected;
                    }
                }
            }
        };

        // Leaves the flag set for anything else watching it
        self.shutdown.request();
        info!(
            reason = %summary.reason,
            frames = summary.frames,
            sent = summary.sent,
            dropped = summary.dropped,
            "run finished"
        );
        summary
    }

    fn report(&self, output: &ControlOutput) {
        if output.status_changed {
            match output.status {
                TrackingStatus::Tracking => info!("hand acquired"),
                TrackingStatus::Lost => info!(
                    policy = ?self.lost_policy,
                    "hand lost, holding {}",
                    output.angles
                ),
            }
        }
        if let (Some(curls), Some(target)) = (&output.curls, &output.target) {
            debug!(curls = ?curls.values(), target = %target, "frame");
        }
        if self.print_angles {
            println!("{}", output.angles);
        }
    }
}
