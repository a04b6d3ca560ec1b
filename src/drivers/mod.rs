pub mod lis3dh;

pub use lis3dh::{I2cRegisters, Register, RegisterAccess};
