//! Serial transport abstractions
//!
//! Provides the transmit trait the control loop writes wire frames to, and
//! the best-effort send contract: a failed write drops that one frame and
//! never stops the loop.

use core::convert::Infallible;
use core::fmt;

/// Classification of a transmit failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxErrorKind {
    /// Transport could not accept the bytes right now
    WouldBlock,
    /// Transport is gone (device unplugged, pipe closed)
    Disconnected,
    /// Any other write failure
    Other,
}

impl fmt::Display for TxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxErrorKind::WouldBlock => f.write_str("would block"),
            TxErrorKind::Disconnected => f.write_str("disconnected"),
            TxErrorKind::Other => f.write_str("write failed"),
        }
    }
}

/// Errors produced by a [`SerialTx`] implementation
pub trait TxError: fmt::Debug {
    /// Classify this error
    fn kind(&self) -> TxErrorKind;
}

impl TxError for Infallible {
    fn kind(&self) -> TxErrorKind {
        match *self {}
    }
}

impl TxError for TxErrorKind {
    fn kind(&self) -> TxErrorKind {
        *self
    }
}

/// Serial transmitter
///
/// Trait for sending wire frames to the actuator controller.
pub trait SerialTx {
    /// Error type for transmit operations
    type Error: TxError;

    /// Write one complete frame
    ///
    /// Implementations should not wait on a full output buffer; report
    /// [`TxErrorKind::WouldBlock`] instead.
    fn write_frame(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    type Error = T::Error;

    fn write_frame(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_frame(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Result of a best-effort send
///
/// Callers may inspect or ignore it; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// Frame handed to the transport
    Sent,
    /// Frame abandoned for this iteration
    Dropped(TxErrorKind),
}

impl SendOutcome {
    /// Check if the frame went out
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }

    /// Check if the transport reported it is permanently gone
    pub fn is_disconnected(&self) -> bool {
        matches!(self, SendOutcome::Dropped(TxErrorKind::Disconnected))
    }
}

/// Send a frame without retrying
///
/// Any write or flush failure drops the frame and is reported as
/// [`SendOutcome::Dropped`]. The next frame supersedes it.
pub fn send_best_effort<T: SerialTx + ?Sized>(tx: &mut T, frame: &[u8]) -> SendOutcome {
    if let Err(e) = tx.write_frame(frame) {
        return SendOutcome::Dropped(e.kind());
    }
    match tx.flush() {
        Ok(()) => SendOutcome::Sent,
        Err(e) => SendOutcome::Dropped(e.kind()),
    }
}

/// Serial line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    /// 8N1 at the given baud rate
    pub fn with_baud(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

impl fmt::Display for SerialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{} {}{}{}", self.baudrate, bits, parity, stop)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Transport that fails according to a script
    struct ScriptedTx {
        write_result: Result<(), TxErrorKind>,
        flush_result: Result<(), TxErrorKind>,
        writes: usize,
    }

    impl ScriptedTx {
        fn new(write_result: Result<(), TxErrorKind>, flush_result: Result<(), TxErrorKind>) -> Self {
            Self {
                write_result,
                flush_result,
                writes: 0,
            }
        }
    }

    impl SerialTx for ScriptedTx {
        type Error = TxErrorKind;

        fn write_frame(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            self.writes += 1;
            self.write_result
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flush_result
        }
    }

    #[test]
    fn test_send_ok() {
        let mut tx = ScriptedTx::new(Ok(()), Ok(()));
        assert_eq!(send_best_effort(&mut tx, b"1,2,3,4,5\n"), SendOutcome::Sent);
        assert_eq!(tx.writes, 1);
    }

    #[test]
    fn test_write_failure_dropped_without_retry() {
        let mut tx = ScriptedTx::new(Err(TxErrorKind::WouldBlock), Ok(()));
        let outcome = send_best_effort(&mut tx, b"1,2,3,4,5\n");
        assert_eq!(outcome, SendOutcome::Dropped(TxErrorKind::WouldBlock));
        assert!(!outcome.is_sent());
        assert!(!outcome.is_disconnected());
        assert_eq!(tx.writes, 1);
    }

    #[test]
    fn test_flush_failure_dropped() {
        let mut tx = ScriptedTx::new(Ok(()), Err(TxErrorKind::Disconnected));
        let outcome = send_best_effort(&mut tx, b"1,2,3,4,5\n");
        assert!(outcome.is_disconnected());
    }

    #[test]
    fn test_send_through_mut_ref() {
        let mut tx = ScriptedTx::new(Ok(()), Ok(()));
        let mut by_ref = &mut tx;
        assert!(send_best_effort(&mut by_ref, b"0,0,0,0,0\n").is_sent());
        assert_eq!(tx.writes, 1);
    }

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config, SerialConfig::with_baud(115200));
    }
}
