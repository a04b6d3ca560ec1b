//! Output side of the firmware: binary frames and diagnostic text.
//!
//! The two are separate logical sinks. On hardware both end up on the same
//! UART through [`SerialLink`], so a reader has to frame-sync on the
//! header and footer bytes (see [`FrameScanner`](super::FrameScanner)).

use core::fmt::{self, Write as _};

use embedded_io_async::Write;
use heapless::String;

use super::frame::WireFrame;
use crate::drivers::lis3dh::Register;
use crate::error::Error;

/// Longest rendered diagnostic line, CR-LF included.
pub const DIAGNOSTIC_LINE_MAX: usize = 80;

/// Human-readable event produced while bringing the sensor up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum Diagnostic {
    DevicePresent(u8),
    /// Value read before any change was made.
    RegisterValue { register: Register, value: u8 },
    Written { register: Register, value: u8 },
    /// Value read back after a write.
    Confirmed { register: Register, value: u8 },
    ReadFailed { register: Register, error: Error },
    WriteFailed { register: Register, error: Error },
    Mismatch {
        register: Register,
        expected: u8,
        actual: u8,
    },
    WritingNewValues,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DevicePresent(addr) => write!(f, "Device 0x{:02X} is connected", addr),
            Self::RegisterValue { register, value } => write!(f, "{}: 0x{:02X}", register, value),
            Self::Written { register, value } => {
                write!(f, "{} successfully written as: 0x{:02X}", register, value)
            }
            Self::Confirmed { register, value } => {
                write!(f, "{} after update: 0x{:02X}", register, value)
            }
            Self::ReadFailed { register, .. } => {
                write!(f, "Error occurred during I2C comm to read {}", register)
            }
            Self::WriteFailed { register, .. } => {
                write!(f, "Error occurred during I2C comm to set {}", register)
            }
            Self::Mismatch {
                register,
                expected,
                actual,
            } => write!(
                f,
                "{} mismatch: expected 0x{:02X}, read 0x{:02X}",
                register, expected, actual
            ),
            Self::WritingNewValues => f.write_str("Writing new values.."),
        }
    }
}

/// Destination for binary telemetry. Frames are written whole or not at all
/// from the pipeline's point of view.
#[allow(async_fn_in_trait)]
pub trait FrameSink {
    async fn send(&mut self, frame: &WireFrame);
}

/// Destination for diagnostic events.
#[allow(async_fn_in_trait)]
pub trait DiagnosticSink {
    async fn report(&mut self, diagnostic: Diagnostic);
}

impl<T: FrameSink> FrameSink for &mut T {
    async fn send(&mut self, frame: &WireFrame) {
        (**self).send(frame).await
    }
}

impl<T: DiagnosticSink> DiagnosticSink for &mut T {
    async fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic).await
    }
}

/// Serial debug link carrying both diagnostics (as CR-LF text lines) and
/// frames (as raw 8-byte writes).
pub struct SerialLink<W> {
    tx: W,
    write_errors: u32,
}

impl<W: Write> SerialLink<W> {
    pub fn new(tx: W) -> Self {
        Self {
            tx,
            write_errors: 0,
        }
    }

    /// UART writes that failed since start-up.
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    pub fn release(self) -> W {
        self.tx
    }

    async fn write_bytes(&mut self, bytes: &[u8]) {
        if self.tx.write_all(bytes).await.is_err() {
            self.write_errors = self.write_errors.wrapping_add(1);
            if self.write_errors % 100 == 1 {
                crate::log_warn!("Debug link write error #{}", self.write_errors);
            }
        }
    }
}

impl<W: Write> FrameSink for SerialLink<W> {
    async fn send(&mut self, frame: &WireFrame) {
        self.write_bytes(frame.as_bytes()).await;
    }
}

impl<W: Write> DiagnosticSink for SerialLink<W> {
    async fn report(&mut self, diagnostic: Diagnostic) {
        let mut line: String<DIAGNOSTIC_LINE_MAX> = String::new();
        // Overlong lines are cut at capacity; the CR-LF is still sent.
        let _ = write!(line, "{}", diagnostic);
        self.write_bytes(line.as_bytes()).await;
        self.write_bytes(b"\r\n").await;
    }
}
