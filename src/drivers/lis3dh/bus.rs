//! Register access over the shared I2C bus.

use embedded_hal::i2c::Error as _;
use embedded_hal_async::i2c::I2c;

use super::registers::{Register, AUTO_INCREMENT};
use crate::error::{Error, Result};

/// Byte-level register service for one device on the bus.
///
/// Every call is a complete, blocking bus transaction from the caller's
/// point of view. Implementations are not interrupt safe and must only be
/// driven from thread mode.
#[allow(async_fn_in_trait)]
pub trait RegisterAccess {
    /// Returns `true` if some device acknowledges `address`.
    async fn probe(&mut self, address: u8) -> bool;

    async fn read_register(&mut self, register: Register) -> Result<u8>;

    async fn write_register(&mut self, register: Register, value: u8) -> Result<()>;

    /// Reads `buf.len()` contiguous registers starting at `start` in one
    /// transaction. On error the contents of `buf` are unspecified.
    async fn read_burst(&mut self, start: Register, buf: &mut [u8]) -> Result<()>;
}

pub struct I2cRegisters<I> {
    i2c: I,
    addr: u8,
}

impl<I: I2c> I2cRegisters<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterAccess for I2cRegisters<I> {
    async fn probe(&mut self, address: u8) -> bool {
        let mut scratch = [0u8; 1];
        self.i2c.read(address, &mut scratch).await.is_ok()
    }

    async fn read_register(&mut self, register: Register) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[register.addr()], &mut buf)
            .await
            .map_err(|e| Error::from(e.kind()))?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        self.i2c
            .write(self.addr, &[register.addr(), value])
            .await
            .map_err(|e| Error::from(e.kind()))
    }

    async fn read_burst(&mut self, start: Register, buf: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(self.addr, &[start.addr() | AUTO_INCREMENT], buf)
            .await
            .map_err(|e| Error::from(e.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::lis3dh::registers::LIS3DH_ADDRESS;
    use crate::error::BusFault;
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// I2C target that behaves like a LIS3DH register file.
    struct FakeBus {
        regs: [u8; 0x40],
        pointer: usize,
        auto_increment: bool,
        fail_reads: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                regs: [0; 0x40],
                pointer: 0,
                auto_increment: false,
                fail_reads: false,
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> core::result::Result<(), Self::Error> {
            if address != LIS3DH_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        let (sub, data) = bytes.split_first().ok_or(ErrorKind::Other)?;
                        self.auto_increment = sub & AUTO_INCREMENT != 0;
                        self.pointer = (sub & !AUTO_INCREMENT) as usize;
                        for b in data {
                            self.regs[self.pointer] = *b;
                            self.pointer += 1;
                        }
                    }
                    Operation::Read(buf) => {
                        if self.fail_reads {
                            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                        }
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer];
                            if self.auto_increment {
                                self.pointer += 1;
                            }
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn probe_acknowledges_only_the_sensor() {
        let mut regs = I2cRegisters::new(FakeBus::new(), LIS3DH_ADDRESS);
        assert!(block_on(regs.probe(0x18)));
        assert!(!block_on(regs.probe(0x19)));
    }

    #[test]
    fn write_then_read_single_register() {
        let mut regs = I2cRegisters::new(FakeBus::new(), LIS3DH_ADDRESS);
        block_on(regs.write_register(Register::CtrlReg1, 0x57)).unwrap();
        assert_eq!(block_on(regs.read_register(Register::CtrlReg1)), Ok(0x57));
        assert_eq!(regs.release().regs[0x20], 0x57);
    }

    #[test]
    fn burst_sets_auto_increment_bit() {
        let mut bus = FakeBus::new();
        bus.regs[0x28..0x2E].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        let mut regs = I2cRegisters::new(bus, LIS3DH_ADDRESS);

        let mut out = [0u8; 6];
        block_on(regs.read_burst(Register::OutXL, &mut out)).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bus_errors_are_mapped() {
        let mut bus = FakeBus::new();
        bus.fail_reads = true;
        let mut regs = I2cRegisters::new(bus, LIS3DH_ADDRESS);
        assert_eq!(
            block_on(regs.read_register(Register::Status)),
            Err(Error::Bus(BusFault::DataNack))
        );

        let mut wrong = I2cRegisters::new(FakeBus::new(), 0x30);
        assert_eq!(
            block_on(wrong.write_register(Register::CtrlReg4, 0x80)),
            Err(Error::Bus(BusFault::AddressNack))
        );
    }
}
