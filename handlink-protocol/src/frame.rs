//! Wire frame encoding for the actuator protocol.
//!
//! Frame format:
//! - 5 base-10 integers (thumb, index, middle, ring, pinky)
//! - separated by `,`
//! - terminated by a single `\n`
//!
//! No leading zeros, no sign, no padding.

use core::fmt::{self, Write};

use heapless::{String, Vec};

/// Number of actuator channels carried by one frame
pub const CHANNEL_COUNT: usize = 5;

/// Maximum encoded frame size (5 × "65535" + 4 commas + newline)
pub const MAX_FRAME_SIZE: usize = CHANNEL_COUNT * 5 + (CHANNEL_COUNT - 1) + 1;

/// Field separator
pub const SEPARATOR: u8 = b',';

/// Frame terminator
pub const TERMINATOR: u8 = b'\n';

/// Errors that can occur during frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Encoded output did not fit the frame buffer
    BufferTooSmall,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::BufferTooSmall => f.write_str("buffer too small for wire frame"),
        }
    }
}

/// One actuator command: an integer angle per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Angles in degrees, in channel order (thumb first)
    pub angles: [u16; CHANNEL_COUNT],
}

impl Command {
    /// Create a command from per-channel angles
    pub const fn new(angles: [u16; CHANNEL_COUNT]) -> Self {
        Self { angles }
    }

    /// Encode this command into a wire frame
    pub fn encode(&self) -> Result<WireFrame, FrameError> {
        let mut text: String<MAX_FRAME_SIZE> = String::new();
        for (i, angle) in self.angles.iter().enumerate() {
            if i > 0 {
                text.push(SEPARATOR as char)
                    .map_err(|_| FrameError::BufferTooSmall)?;
            }
            write!(text, "{}", angle).map_err(|_| FrameError::BufferTooSmall)?;
        }
        text.push(TERMINATOR as char)
            .map_err(|_| FrameError::BufferTooSmall)?;

        Ok(WireFrame {
            bytes: text.into_bytes(),
        })
    }
}

/// An encoded, ready-to-send frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl WireFrame {
    /// Raw ASCII bytes, including the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame text without the trailing newline
    pub fn as_str(&self) -> &str {
        // Only ASCII digits, commas and the terminator are ever written
        let body = &self.bytes[..self.bytes.len().saturating_sub(1)];
        core::str::from_utf8(body).unwrap_or("")
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the frame holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for WireFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_canonical_frame() {
        let frame = Command::new([180, 0, 180, 0, 180]).encode().unwrap();
        assert_eq!(frame.as_bytes(), b"180,0,180,0,180\n");
        assert_eq!(frame.as_str(), "180,0,180,0,180");
    }

    #[test]
    fn test_encode_no_leading_zeros() {
        let frame = Command::new([7, 42, 90, 100, 5]).encode().unwrap();
        assert_eq!(frame.as_bytes(), b"7,42,90,100,5\n");
    }

    #[test]
    fn test_encode_max_values_fit() {
        let frame = Command::new([u16::MAX; CHANNEL_COUNT]).encode().unwrap();
        assert_eq!(frame.len(), MAX_FRAME_SIZE);
        assert_eq!(frame.as_bytes().last(), Some(&TERMINATOR));
    }

    #[test]
    fn test_frame_is_ascii() {
        let frame = Command::new([1, 22, 333, 4444, 55555]).encode().unwrap();
        assert!(frame.as_bytes().iter().all(|b| b.is_ascii()));
        assert_eq!(
            frame.as_bytes().iter().filter(|&&b| b == SEPARATOR).count(),
            CHANNEL_COUNT - 1
        );
    }
}
