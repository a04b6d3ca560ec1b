#![cfg_attr(not(test), no_std)]

mod logging;

pub mod acquisition;
#[cfg(feature = "firmware")]
pub mod board;
pub mod config;
pub mod drivers;
pub mod error;
pub mod ipc;
#[cfg(feature = "firmware")]
pub mod tasks;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use acquisition::{Acquisition, AcquisitionStats, CycleOutcome};
#[cfg(feature = "firmware")]
pub use board::Board;
pub use error::{Error, Result};
pub use telemetry::{Sample, WireFrame};
