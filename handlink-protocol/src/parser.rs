//! Receiver-side frame decoding.
//!
//! Used by the actuator controller to turn the incoming byte stream back
//! into [`Command`]s. The parser is byte-at-a-time so it can sit directly
//! behind a UART RX interrupt or DMA buffer.

use core::fmt;

use crate::frame::{Command, CHANNEL_COUNT, MAX_FRAME_SIZE, SEPARATOR, TERMINATOR};

/// Errors that can occur while decoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line did not carry exactly five values
    FieldCount,
    /// A value was empty (`,,` or a leading/trailing comma)
    EmptyField,
    /// Byte other than a digit, comma, CR or LF
    InvalidCharacter(u8),
    /// Value does not fit in 16 bits
    Overflow,
    /// Line grew past the longest valid frame without a terminator
    LineTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FieldCount => f.write_str("wrong number of fields"),
            ParseError::EmptyField => f.write_str("empty field"),
            ParseError::InvalidCharacter(b) => write!(f, "invalid character 0x{:02x}", b),
            ParseError::Overflow => f.write_str("value out of range"),
            ParseError::LineTooLong => f.write_str("line too long"),
        }
    }
}

/// State machine for decoding incoming lines
#[derive(Debug, Clone)]
pub struct LineParser {
    values: [u16; CHANNEL_COUNT],
    field: usize,
    current: u32,
    digits: usize,
    line_len: usize,
    /// Set after an error until the next terminator
    discarding: bool,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub const fn new() -> Self {
        Self {
            values: [0; CHANNEL_COUNT],
            field: 0,
            current: 0,
            digits: 0,
            line_len: 0,
            discarding: false,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(command))` when a complete valid line is decoded,
    /// `Ok(None)` when more bytes are needed, or `Err` on a malformed line.
    /// After an error the rest of the line is skipped and decoding resumes
    /// with the next one.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Command>, ParseError> {
        if self.discarding {
            if byte == TERMINATOR {
                self.reset();
            }
            return Ok(None);
        }

        if byte == b'\r' {
            return Ok(None);
        }

        if byte == TERMINATOR {
            let result = self.finish_line();
            self.reset();
            return result.map(Some);
        }

        self.line_len += 1;
        if self.line_len >= MAX_FRAME_SIZE {
            return self.fail(ParseError::LineTooLong);
        }

        match byte {
            b'0'..=b'9' => {
                self.current = self.current * 10 + u32::from(byte - b'0');
                self.digits += 1;
                if self.current > u32::from(u16::MAX) {
                    return self.fail(ParseError::Overflow);
                }
                Ok(None)
            }
            SEPARATOR => {
                if let Err(e) = self.close_field() {
                    return self.fail(e);
                }
                Ok(None)
            }
            other => self.fail(ParseError::InvalidCharacter(other)),
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete command found, if any.
    /// Remaining bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Command>, ParseError> {
        for &byte in bytes {
            if let Some(command) = self.feed(byte)? {
                return Ok(Some(command));
            }
        }
        Ok(None)
    }

    fn fail(&mut self, error: ParseError) -> Result<Option<Command>, ParseError> {
        self.reset();
        self.discarding = true;
        Err(error)
    }

    fn close_field(&mut self) -> Result<(), ParseError> {
        if self.digits == 0 {
            return Err(ParseError::EmptyField);
        }
        if self.field >= CHANNEL_COUNT {
            return Err(ParseError::FieldCount);
        }
        self.values[self.field] = self.current as u16;
        self.field += 1;
        self.current = 0;
        self.digits = 0;
        Ok(())
    }

    fn finish_line(&mut self) -> Result<Command, ParseError> {
        self.close_field()?;
        if self.field != CHANNEL_COUNT {
            return Err(ParseError::FieldCount);
        }
        Ok(Command::new(self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_line() {
        let mut parser = LineParser::new();
        let cmd = parser.feed_bytes(b"180,0,90,45,7\n").unwrap().unwrap();
        assert_eq!(cmd.angles, [180, 0, 90, 45, 7]);
    }

    #[test]
    fn test_parse_crlf() {
        let mut parser = LineParser::new();
        let cmd = parser.feed_bytes(b"1,2,3,4,5\r\n").unwrap().unwrap();
        assert_eq!(cmd.angles, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_too_few_fields() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed_bytes(b"1,2,3\n"), Err(ParseError::FieldCount));
    }

    #[test]
    fn test_too_many_fields() {
        let mut parser = LineParser::new();
        assert_eq!(
            parser.feed_bytes(b"1,2,3,4,5,6\n"),
            Err(ParseError::FieldCount)
        );
    }

    #[test]
    fn test_empty_field() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed_bytes(b"1,,3,4,5\n"), Err(ParseError::EmptyField));
    }

    #[test]
    fn test_overflow() {
        let mut parser = LineParser::new();
        assert_eq!(
            parser.feed_bytes(b"65536,0,0,0,0\n"),
            Err(ParseError::Overflow)
        );
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut parser = LineParser::new();
        assert_eq!(
            parser.feed_bytes(b"9x9,1\n"),
            Err(ParseError::InvalidCharacter(b'x'))
        );
        // Tail of the bad line is skipped, next line decodes
        let cmd = parser.feed_bytes(b"9,1\n10,20,30,40,50\n").unwrap().unwrap();
        assert_eq!(cmd.angles, [10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_line_too_long() {
        // Leading zeros never overflow, so only the length check can trip
        let mut long = [b'0'; MAX_FRAME_SIZE + 4];
        long[..8].copy_from_slice(b"0,0,0,0,");
        let mut parser = LineParser::new();
        assert_eq!(parser.feed_bytes(&long), Err(ParseError::LineTooLong));
    }

    #[test]
    fn test_remaining_bytes_not_consumed() {
        let mut parser = LineParser::new();
        let data = b"1,1,1,1,1\n2,2,2,2,2\n";
        let first = parser.feed_bytes(&data[..10]).unwrap().unwrap();
        assert_eq!(first.angles, [1; CHANNEL_COUNT]);
        let second = parser.feed_bytes(&data[10..]).unwrap().unwrap();
        assert_eq!(second.angles, [2; CHANNEL_COUNT]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_decodes_every_encoded_command(angles in proptest::array::uniform5(any::<u16>())) {
                let frame = Command::new(angles).encode().unwrap();
                let mut parser = LineParser::new();
                let decoded = parser.feed_bytes(frame.as_bytes()).unwrap();
                prop_assert_eq!(decoded, Some(Command::new(angles)));
            }
        }
    }
}
