use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

use crate::drivers::lis3dh::Register;

/// Reason a single bus transaction did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum BusFault {
    /// Nobody acknowledged the address byte.
    AddressNack,
    /// The device stopped acknowledging data bytes.
    DataNack,
    ArbitrationLoss,
    Overrun,
    Bus,
    Other,
}

impl From<ErrorKind> for BusFault {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Self::AddressNack,
            ErrorKind::NoAcknowledge(_) => Self::DataNack,
            ErrorKind::ArbitrationLoss => Self::ArbitrationLoss,
            ErrorKind::Overrun => Self::Overrun,
            ErrorKind::Bus => Self::Bus,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum Error {
    /// A register transaction failed on the bus.
    Bus(BusFault),
    /// Data-ready never asserted within a bounded wait.
    DeviceNotResponding,
    /// Read-back after configuration did not match the required value.
    ConfigurationMismatch {
        register: Register,
        expected: u8,
        actual: u8,
    },
}

impl From<BusFault> for Error {
    fn from(fault: BusFault) -> Self {
        Self::Bus(fault)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::Bus(kind.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(fault) => write!(f, "bus transaction failed: {:?}", fault),
            Self::DeviceNotResponding => f.write_str("device never signalled data-ready"),
            Self::ConfigurationMismatch {
                register,
                expected,
                actual,
            } => write!(
                f,
                "{} reads 0x{:02X}, expected 0x{:02X}",
                register, actual, expected
            ),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
