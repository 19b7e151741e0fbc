//! Landmark sources
//!
//! The hand detector runs out of process and reports one JSON object per
//! camera frame on its stdout:
//!
//! ```text
//! {"width":640,"height":480,"hands":[{"score":0.93,"landmarks":[{"x":0.41,"y":0.62,"z":0.0}, ...]}]}
//! {"width":640,"height":480,"hands":[]}
//! {"quit":true}
//! ```
//!
//! Coordinates are normalized to the image. They are scaled back to pixels
//! so that distance ratios are computed in an isotropic space. Lines that
//! fail to decode, are not UTF-8, or exceed the line limit count as frames
//! without a hand.

use std::io::{self, BufRead, BufReader, Read};
use std::str;
use std::process::{Child, ChildStdout, Command, Stdio};

use handlink_core::{Landmarks, Point};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Landmark source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("detector command is empty")]
    EmptyCommand,
    #[error("failed to start detector `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("detector stdout unavailable")]
    NoStdout,
    #[error("failed to read detector output: {0}")]
    Read(#[from] io::Error),
}

/// What a source produced for one iteration
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// One camera frame; `None` when no hand passed the confidence gate
    Frame(Option<Landmarks>),
    /// Operator asked to stop
    Quit,
    /// The source has no more frames
    EndOfStream,
}

/// Anything that yields per-frame detections
pub trait LandmarkSource {
    /// Block until the next frame, quit request or end of stream
    fn next_event(&mut self) -> Result<SourceEvent, SourceError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_event(&mut self) -> Result<SourceEvent, SourceError> {
        (**self).next_event()
    }
}

#[derive(Debug, Deserialize)]
struct PointJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Debug, Deserialize)]
struct HandJson {
    #[serde(default = "full_confidence")]
    score: f32,
    landmarks: Vec<PointJson>,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    quit: bool,
    #[serde(default)]
    error: Option<String>,
}

fn full_confidence() -> f32 {
    1.0
}

/// Longest detector line accepted, newline included
///
/// Two hands of 21 landmarks at full float precision stay well below this.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Reads detector JSON lines from any buffered reader
pub struct JsonLinesSource<R> {
    reader: R,
    min_confidence: f32,
    max_line: usize,
    line: Vec<u8>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, min_confidence: f32) -> Self {
        Self {
            reader,
            min_confidence,
            max_line: MAX_LINE_BYTES,
            line: Vec::new(),
        }
    }

    /// Override the line length limit
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line.max(1);
        self
    }

    /// Drop input up to and including the next newline
    fn skip_line(&mut self) -> io::Result<()> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    self.reader.consume(end + 1);
                    return Ok(());
                }
                None => {
                    let len = buf.len();
                    self.reader.consume(len);
                }
            }
        }
    }

    /// Decode one line into an event
    pub fn decode_line(&self, line: &str) -> SourceEvent {
        let frame: FrameJson = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "undecodable detector line");
                return SourceEvent::Frame(None);
            }
        };

        if frame.quit {
            return SourceEvent::Quit;
        }
        if let Some(error) = frame.error {
            warn!(%error, "detector reported an error");
            return SourceEvent::Frame(None);
        }

        let sx = frame.width.unwrap_or(1.0);
        let sy = frame.height.unwrap_or(1.0);

        // First hand that clears the gate wins
        for hand in frame.hands {
            if !(hand.score >= self.min_confidence) {
                debug!(score = hand.score, "hand below confidence threshold");
                continue;
            }
            let points: Vec<Point> = hand
                .landmarks
                .iter()
                .map(|p| Point::new(p.x, p.y, p.z))
                .collect();
            match Landmarks::from_slice(&points) {
                Ok(landmarks) => return SourceEvent::Frame(Some(landmarks.scaled(sx, sy))),
                Err(e) => warn!(error = %e, "malformed hand"),
            }
        }

        SourceEvent::Frame(None)
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_event(&mut self) -> Result<SourceEvent, SourceError> {
        loop {
            self.line.clear();
            let limit = self.max_line as u64;
            let read = (&mut self.reader).take(limit).read_until(b'\n', &mut self.line)?;
            if read == 0 {
                return Ok(SourceEvent::EndOfStream);
            }

            if read == self.max_line && self.line.last() != Some(&b'\n') {
                warn!(limit = self.max_line, "detector line too long");
                self.skip_line()?;
                return Ok(SourceEvent::Frame(None));
            }

            let Ok(text) = str::from_utf8(&self.line) else {
                warn!("detector line is not UTF-8");
                return Ok(SourceEvent::Frame(None));
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            return Ok(self.decode_line(text));
        }
    }
}

/// Detector running as a child process
///
/// The child is killed when this is dropped.
pub struct DetectorProcess {
    child: Child,
    lines: JsonLinesSource<BufReader<ChildStdout>>,
}

impl DetectorProcess {
    /// Start `command[0]` with the remaining entries as arguments
    pub fn spawn(command: &[String], min_confidence: f32) -> Result<Self, SourceError> {
        let (program, args) = command.split_first().ok_or(SourceError::EmptyCommand)?;

        info!(%program, "starting hand detector");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(SourceError::NoStdout);
        };

        Ok(Self {
            child,
            lines: JsonLinesSource::new(BufReader::new(stdout), min_confidence),
        })
    }
}

impl LandmarkSource for DetectorProcess {
    fn next_event(&mut self) -> Result<SourceEvent, SourceError> {
        self.lines.next_event()
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    /// Open hand in normalized coordinates on a 640x480 image
    fn hand_json(score: f32, count: usize) -> String {
        let mut landmarks = String::new();
        for i in 0..count {
            if i > 0 {
                landmarks.push(',');
            }
            let x = 0.3 + 0.01 * i as f32;
            let y = 0.8 - 0.02 * i as f32;
            write!(landmarks, r#"{{"x":{x},"y":{y},"z":0.0}}"#).unwrap();
        }
        format!(r#"{{"score":{score},"landmarks":[{landmarks}]}}"#)
    }

    fn frame_json(hands: &[String]) -> String {
        format!(r#"{{"width":640,"height":480,"hands":[{}]}}"#, hands.join(","))
    }

    fn source(input: &str) -> JsonLinesSource<&[u8]> {
        JsonLinesSource::new(input.as_bytes(), 0.6)
    }

    #[test]
    fn test_frame_with_hand_scaled_to_pixels() {
        let line = frame_json(&[hand_json(0.9, 21)]);
        let SourceEvent::Frame(Some(landmarks)) = source("").decode_line(&line) else {
            panic!("expected a hand");
        };
        let wrist = landmarks.points()[0];
        assert!((wrist.x - 0.3 * 640.0).abs() < 1e-3);
        assert!((wrist.y - 0.8 * 480.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_hands_is_missing() {
        assert_eq!(source("").decode_line(&frame_json(&[])), SourceEvent::Frame(None));
    }

    #[test]
    fn test_low_confidence_is_missing() {
        let line = frame_json(&[hand_json(0.59, 21)]);
        assert_eq!(source("").decode_line(&line), SourceEvent::Frame(None));
    }

    #[test]
    fn test_first_confident_hand_wins() {
        let line = frame_json(&[hand_json(0.2, 21), hand_json(0.7, 21)]);
        assert!(matches!(
            source("").decode_line(&line),
            SourceEvent::Frame(Some(_))
        ));
    }

    #[test]
    fn test_wrong_landmark_count_is_missing() {
        let line = frame_json(&[hand_json(0.9, 20)]);
        assert_eq!(source("").decode_line(&line), SourceEvent::Frame(None));
    }

    #[test]
    fn test_garbage_and_error_lines_are_missing() {
        let src = source("");
        assert_eq!(src.decode_line("not json"), SourceEvent::Frame(None));
        assert_eq!(
            src.decode_line(r#"{"error":"camera unavailable"}"#),
            SourceEvent::Frame(None)
        );
    }

    #[test]
    fn test_stream_events() {
        let input = format!(
            "{}\n\n{}\n{{\"quit\":true}}\n",
            frame_json(&[hand_json(0.9, 21)]),
            frame_json(&[])
        );
        let mut src = source(&input);
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Frame(Some(_))));
        // Blank line skipped
        assert_eq!(src.next_event().unwrap(), SourceEvent::Frame(None));
        assert_eq!(src.next_event().unwrap(), SourceEvent::Quit);
        assert_eq!(src.next_event().unwrap(), SourceEvent::EndOfStream);
    }

    #[test]
    fn test_invalid_utf8_line_is_missing() {
        let input = b"{\"hands\":[]}\n{\"error\":\"\xff\xfe\"}\n{\"hands\":[]}\n";
        let mut src = JsonLinesSource::new(&input[..], 0.6);
        assert_eq!(src.next_event().unwrap(), SourceEvent::Frame(None));
        assert_eq!(src.next_event().unwrap(), SourceEvent::Frame(None));
        assert_eq!(src.next_event().unwrap(), SourceEvent::Frame(None));
        assert_eq!(src.next_event().unwrap(), SourceEvent::EndOfStream);
    }

    #[test]
    fn test_over_long_line_is_skipped() {
        let hand = frame_json(&[hand_json(0.9, 21)]);
        let input = format!("{}\n{hand}\n{{\"quit\":true}}\n", "x".repeat(10_000));
        let mut src = JsonLinesSource::new(input.as_bytes(), 0.6).with_max_line(hand.len() + 1);

        assert_eq!(src.next_event().unwrap(), SourceEvent::Frame(None));
        // The rest of the long line was discarded, not read as a new line
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Frame(Some(_))));
        assert_eq!(src.next_event().unwrap(), SourceEvent::Quit);
    }

    #[test]
    fn test_unterminated_last_line_decoded() {
        let mut src = source(r#"{"quit":true}"#);
        assert_eq!(src.next_event().unwrap(), SourceEvent::Quit);
        assert_eq!(src.next_event().unwrap(), SourceEvent::EndOfStream);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(
            DetectorProcess::spawn(&[], 0.5),
            Err(SourceError::EmptyCommand)
        ));
    }

    #[test]
    fn test_missing_program_rejected() {
        let command = vec!["/nonexistent/handlink-detector".to_string()];
        assert!(matches!(
            DetectorProcess::spawn(&command, 0.5),
            Err(SourceError::Spawn { .. })
        ));
    }
}
