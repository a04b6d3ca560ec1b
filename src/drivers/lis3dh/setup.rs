//! One-shot sensor bring-up.
//!
//! Every step checks its own bus transactions, reports what happened on the
//! diagnostic sink and records a structured outcome. A failed step never
//! stops the steps after it, and nothing here is fatal to acquisition.

use heapless::Vec;

use super::bus::RegisterAccess;
use super::registers::{Register, CTRL_REG1_SET, CTRL_REG4_SET, LIS3DH_ADDRESS, WHO_AM_I_VALUE};
use crate::error::{Error, Result};
use crate::telemetry::{Diagnostic, DiagnosticSink};
use crate::{log_error, log_info, log_warn};

/// Number of 7-bit bus addresses probed by [`scan`].
pub const ADDRESS_SPACE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum RegisterOutcome {
    /// Register already held the required value; nothing was written.
    Unchanged(u8),
    /// Written and confirmed by read-back. `previous` is `None` if the
    /// initial read failed.
    Written { previous: Option<u8>, confirmed: u8 },
    Failed(Error),
}

impl RegisterOutcome {
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub devices: Vec<u8, ADDRESS_SPACE>,
    pub identity: Result<u8>,
    pub status: Result<u8>,
    pub ctrl_reg1: RegisterOutcome,
    pub ctrl_reg4: RegisterOutcome,
}

impl SetupReport {
    pub fn saw_device(&self, addr: u8) -> bool {
        self.devices.contains(&addr)
    }

    /// Both control registers are confirmed at their operating values.
    pub fn is_ready(&self) -> bool {
        self.ctrl_reg1.is_configured() && self.ctrl_reg4.is_configured()
    }
}

/// Runs the whole bring-up sequence in order.
pub async fn configure<R, D>(regs: &mut R, diag: &mut D) -> SetupReport
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    log_info!("Starting LIS3DH configuration...");

    let devices = scan(regs, diag).await;
    if !devices.contains(&LIS3DH_ADDRESS) {
        log_error!("No LIS3DH acknowledged at 0x{:02X}", LIS3DH_ADDRESS);
    }
    let identity = check_identity(regs, diag).await;
    let status = inspect_status(regs, diag).await;
    let ctrl_reg1 = configure_ctrl_reg1(regs, diag).await;
    let ctrl_reg4 = configure_ctrl_reg4(regs, diag).await;

    let report = SetupReport {
        devices,
        identity,
        status,
        ctrl_reg1,
        ctrl_reg4,
    };

    if report.is_ready() {
        log_info!("LIS3DH configuration complete");
    } else {
        log_warn!(
            "LIS3DH configuration incomplete: ctrl1={:?} ctrl4={:?}",
            report.ctrl_reg1,
            report.ctrl_reg4
        );
    }
    report
}

/// Probes every 7-bit address and reports each one that answers.
pub async fn scan<R, D>(regs: &mut R, diag: &mut D) -> Vec<u8, ADDRESS_SPACE>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    let mut found = Vec::new();
    for addr in 0..ADDRESS_SPACE as u8 {
        if regs.probe(addr).await {
            diag.report(Diagnostic::DevicePresent(addr)).await;
            // Capacity equals the address space.
            let _ = found.push(addr);
        }
    }
    log_info!("Bus scan found {} device(s)", found.len());
    found
}

pub async fn check_identity<R, D>(regs: &mut R, diag: &mut D) -> Result<u8>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    let id = read_reported(regs, diag, Register::WhoAmI).await?;
    if id != WHO_AM_I_VALUE {
        return Err(mismatch(diag, Register::WhoAmI, WHO_AM_I_VALUE, id).await);
    }
    Ok(id)
}

pub async fn inspect_status<R, D>(regs: &mut R, diag: &mut D) -> Result<u8>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    read_reported(regs, diag, Register::Status).await
}

/// Brings CTRL_REG1 to 100 Hz normal mode with all axes on. The write is
/// skipped when the register already holds that value, but the register is
/// still read back and reported.
pub async fn configure_ctrl_reg1<R, D>(regs: &mut R, diag: &mut D) -> RegisterOutcome
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    let current = read_reported(regs, diag, Register::CtrlReg1).await;
    diag.report(Diagnostic::WritingNewValues).await;

    let current = match current {
        Ok(value) => value,
        Err(e) => return RegisterOutcome::Failed(e),
    };

    if current == CTRL_REG1_SET {
        log_info!("CTRL_REG1 already 0x{:02X}, not rewriting", current);
        return match read_back(regs, diag, Register::CtrlReg1, CTRL_REG1_SET).await {
            Ok(confirmed) => RegisterOutcome::Unchanged(confirmed),
            Err(e) => RegisterOutcome::Failed(e),
        };
    }

    match write_verified(regs, diag, Register::CtrlReg1, CTRL_REG1_SET).await {
        Ok(confirmed) => RegisterOutcome::Written {
            previous: Some(current),
            confirmed,
        },
        Err(e) => RegisterOutcome::Failed(e),
    }
}

/// Enables block data update. The write is unconditional; the initial read
/// is informational only.
pub async fn configure_ctrl_reg4<R, D>(regs: &mut R, diag: &mut D) -> RegisterOutcome
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    let previous = read_reported(regs, diag, Register::CtrlReg4).await.ok();

    match write_verified(regs, diag, Register::CtrlReg4, CTRL_REG4_SET).await {
        Ok(confirmed) => RegisterOutcome::Written {
            previous,
            confirmed,
        },
        Err(e) => RegisterOutcome::Failed(e),
    }
}

async fn read_reported<R, D>(regs: &mut R, diag: &mut D, register: Register) -> Result<u8>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    match regs.read_register(register).await {
        Ok(value) => {
            diag.report(Diagnostic::RegisterValue { register, value }).await;
            Ok(value)
        }
        Err(error) => {
            log_warn!("Read of {:?} failed: {:?}", register, error);
            diag.report(Diagnostic::ReadFailed { register, error }).await;
            Err(error)
        }
    }
}

/// Write, read back, compare.
async fn write_verified<R, D>(regs: &mut R, diag: &mut D, register: Register, value: u8) -> Result<u8>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    if let Err(error) = regs.write_register(register, value).await {
        log_warn!("Write of {:?} failed: {:?}", register, error);
        diag.report(Diagnostic::WriteFailed { register, error }).await;
        return Err(error);
    }
    diag.report(Diagnostic::Written { register, value }).await;

    read_back(regs, diag, register, value).await
}

/// Re-reads `register`, reports it and checks it holds `expected`.
async fn read_back<R, D>(regs: &mut R, diag: &mut D, register: Register, expected: u8) -> Result<u8>
where
    R: RegisterAccess,
    D: DiagnosticSink,
{
    let confirmed = match regs.read_register(register).await {
        Ok(confirmed) => confirmed,
        Err(error) => {
            log_warn!("Read-back of {:?} failed: {:?}", register, error);
            diag.report(Diagnostic::ReadFailed { register, error }).await;
            return Err(error);
        }
    };
    diag.report(Diagnostic::Confirmed {
        register,
        value: confirmed,
    })
    .await;

    if confirmed != expected {
        return Err(mismatch(diag, register, expected, confirmed).await);
    }
    Ok(confirmed)
}

async fn mismatch<D: DiagnosticSink>(diag: &mut D, register: Register, expected: u8, actual: u8) -> Error {
    log_warn!(
        "{:?} reads 0x{:02X}, expected 0x{:02X}",
        register,
        actual,
        expected
    );
    diag.report(Diagnostic::Mismatch {
        register,
        expected,
        actual,
    })
    .await;
    Error::ConfigurationMismatch {
        register,
        expected,
        actual,
    }
}
