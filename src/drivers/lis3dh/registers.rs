// LIS3DH register map and the bit patterns this firmware programs.

use core::fmt;

/* ───── Bus identity ────────────────────────────────────────────────── */
/// 7-bit address with SA0 tied low.
pub const LIS3DH_ADDRESS: u8 = 0x18;
pub const WHO_AM_I_VALUE: u8 = 0x33;

/// Sub-address MSB: auto-increment across a multi-byte transfer.
pub const AUTO_INCREMENT: u8 = 0x80;

/* ───── STATUS_REG bits ─────────────────────────────────────────────── */
/// New X, Y and Z data available.
pub const STATUS_ZYXDA: u8 = 1 << 3;

/* ───── CTRL_REG1: ODR 100 Hz, normal mode, X/Y/Z enabled ───────────── */
pub const CTRL_REG1_ODR_100HZ: u8 = 0b0101 << 4;
pub const CTRL_REG1_XYZ_EN: u8 = 0b0111;
pub const CTRL_REG1_SET: u8 = CTRL_REG1_ODR_100HZ | CTRL_REG1_XYZ_EN;

/* ───── CTRL_REG4: block data update ────────────────────────────────── */
pub const CTRL_REG4_BDU: u8 = 1 << 7;
pub const CTRL_REG4_SET: u8 = CTRL_REG4_BDU;

/// Bytes in one X/Y/Z output burst.
pub const BURST_LEN: usize = 6;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum Register {
    WhoAmI = 0x0F,
    CtrlReg1 = 0x20,
    CtrlReg4 = 0x23,
    Status = 0x27,
    OutXL = 0x28,
    OutXH = 0x29,
    OutYL = 0x2A,
    OutYH = 0x2B,
    OutZL = 0x2C,
    OutZH = 0x2D,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::WhoAmI => "WHO_AM_I",
            Self::CtrlReg1 => "CONTROL REGISTER 1",
            Self::CtrlReg4 => "CONTROL REGISTER 4",
            Self::Status => "STATUS REGISTER",
            Self::OutXL => "OUT_X_L",
            Self::OutXH => "OUT_X_H",
            Self::OutYL => "OUT_Y_L",
            Self::OutYH => "OUT_Y_H",
            Self::OutZL => "OUT_Z_L",
            Self::OutZH => "OUT_Z_H",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
