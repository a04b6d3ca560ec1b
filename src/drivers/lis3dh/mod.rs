//! ST LIS3DH triaxial accelerometer on I2C.

pub mod bus;
pub mod registers;
pub mod setup;

pub use bus::{I2cRegisters, RegisterAccess};
pub use registers::*;
pub use setup::{configure, RegisterOutcome, SetupReport};
