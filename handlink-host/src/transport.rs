//! Host-side transports
//!
//! `WriteTx` adapts any `std::io::Write` to the frame transport trait and
//! classifies I/O failures. The serial device is opened through
//! `serialport` in raw mode at the configured line settings, with a short
//! write timeout so a full output buffer drops the frame instead of
//! stalling the loop.

use std::io::{self, Write};
use std::time::Duration;

use handlink_hal::{
    acquire, AcquireError, DataBits, Parity, RetryPolicy, SerialConfig, SerialTx, StopBits, TxError,
    TxErrorKind,
};
use serialport::{FlowControl, SerialPort};
use tracing::{info, warn};

/// Written ahead of the next frame after a frame was cut off
///
/// `!` is not a legal frame byte, so the receiver rejects the partial line
/// it terminates instead of accepting a truncated value.
const RESYNC: &[u8] = b"!\n";

/// Classify an I/O error kind for the send path
pub fn classify(kind: io::ErrorKind) -> TxErrorKind {
    match kind {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted => {
            TxErrorKind::WouldBlock
        }
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::NotConnected
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::UnexpectedEof => TxErrorKind::Disconnected,
        _ => TxErrorKind::Other,
    }
}

/// I/O error raised while sending a frame
#[derive(Debug)]
pub struct IoTxError(pub io::Error);

impl TxError for IoTxError {
    fn kind(&self) -> TxErrorKind {
        classify(self.0.kind())
    }
}

/// Frame transport over a byte stream
#[derive(Debug)]
pub struct WriteTx<W> {
    inner: W,
    /// A frame was cut off and its line still needs terminating
    torn: bool,
}

impl<W: Write> WriteTx<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, torn: false }
    }

    /// Write `bytes`, reporting how many went out before a failure
    fn write_counted(&mut self, bytes: &[u8]) -> Result<(), (usize, io::Error)> {
        let mut written = 0;
        while written < bytes.len() {
            match self.inner.write(&bytes[written..]) {
                Ok(0) => return Err((written, io::ErrorKind::WriteZero.into())),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err((written, e)),
            }
        }
        Ok(())
    }
}

impl<W: Write> SerialTx for WriteTx<W> {
    type Error = IoTxError;

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        if self.torn {
            self.write_counted(RESYNC).map_err(|(_, e)| IoTxError(e))?;
            self.torn = false;
        }

        self.write_counted(frame).map_err(|(written, e)| {
            if written > 0 {
                warn!(written, len = frame.len(), "frame cut off");
                self.torn = true;
            }
            IoTxError(e)
        })
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(IoTxError)
    }
}

/// Serial port opened in raw mode
pub type SerialDevice = WriteTx<Box<dyn SerialPort>>;

fn data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    }
}

fn stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

/// Open the serial device, retrying while the controller comes up
pub fn open_serial(
    port: &str,
    line: &SerialConfig,
    write_timeout: Duration,
    policy: &RetryPolicy,
) -> Result<SerialDevice, AcquireError<serialport::Error>> {
    let device = acquire(
        policy,
        |attempt| {
            serialport::new(port, line.baudrate)
                .data_bits(data_bits(line.data_bits))
                .parity(parity(line.parity))
                .stop_bits(stop_bits(line.stop_bits))
                .flow_control(FlowControl::None)
                .timeout(write_timeout)
                .open()
                .inspect_err(|e| warn!(attempt, port, error = %e, "serial open failed"))
        },
        std::thread::sleep,
    )?;
    info!(port, line = %line, "serial port open");
    Ok(WriteTx::new(device))
}

/// Transport that logs frames instead of sending them
#[derive(Debug, Default)]
pub struct DryRun {
    frames: u64,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SerialTx for DryRun {
    type Error = TxErrorKind;

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.frames += 1;
        let text = String::from_utf8_lossy(frame);
        info!(frame = self.frames, "tx {}", text.trim_end());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
