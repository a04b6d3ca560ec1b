//! Test doubles: a simulated LIS3DH behind [`RegisterAccess`] and
//! recording sinks.

use std::vec::Vec;

use crate::drivers::lis3dh::{Register, RegisterAccess, LIS3DH_ADDRESS, STATUS_ZYXDA, WHO_AM_I_VALUE};
use crate::error::{BusFault, Error, Result};
use crate::telemetry::{Diagnostic, DiagnosticSink, FrameSink, WireFrame};

/// Bus operation as seen by the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Probe(u8),
    Read(Register),
    Write(Register, u8),
    Burst(Register, usize),
}

/// Register-level model of a LIS3DH plus whatever else answers on the bus.
pub struct SimulatedLis3dh {
    regs: [u8; 0x40],
    others: Vec<u8>,
    detached: bool,
    log: Vec<Op>,
    failing_reads: Vec<Register>,
    transient_reads: Vec<(Register, u32)>,
    fail_writes: bool,
    write_masks: Vec<(Register, u8)>,
    failing_bursts: u32,
    not_ready_polls: Option<u32>,
}

impl SimulatedLis3dh {
    /// Power-on defaults: CTRL_REG1 = 0x07, CTRL_REG4 = 0x00, data ready.
    pub fn new() -> Self {
        let mut regs = [0u8; 0x40];
        regs[Register::WhoAmI.addr() as usize] = WHO_AM_I_VALUE;
        regs[Register::CtrlReg1.addr() as usize] = 0x07;
        regs[Register::Status.addr() as usize] = STATUS_ZYXDA;
        Self {
            regs,
            others: Vec::new(),
            detached: false,
            log: Vec::new(),
            failing_reads: Vec::new(),
            transient_reads: Vec::new(),
            fail_writes: false,
            write_masks: Vec::new(),
            failing_bursts: 0,
            not_ready_polls: Some(0),
        }
    }

    pub fn set(&mut self, register: Register, value: u8) {
        self.regs[register.addr() as usize] = value;
    }

    pub fn get(&self, register: Register) -> u8 {
        self.regs[register.addr() as usize]
    }

    pub fn log(&self) -> &[Op] {
        &self.log
    }

    pub fn add_bus_device(&mut self, addr: u8) {
        self.others.push(addr);
    }

    /// Sensor stops acknowledging its address during the bus scan.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn fail_reads_of(&mut self, register: Register) {
        self.failing_reads.push(register);
    }

    pub fn fail_next_reads_of(&mut self, register: Register, count: u32) {
        self.transient_reads.push((register, count));
    }

    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    /// Only bits in `mask` stick when `register` is written.
    pub fn mask_writes(&mut self, register: Register, mask: u8) {
        self.write_masks.push((register, mask));
    }

    pub fn fail_next_bursts(&mut self, count: u32) {
        self.failing_bursts = count;
    }

    /// Next `polls` status reads show no new data.
    pub fn not_ready_for(&mut self, polls: u32) {
        self.not_ready_polls = Some(polls);
    }

    pub fn never_ready(&mut self) {
        self.not_ready_polls = None;
    }

    /// Places one raw X/Y/Z burst in the output registers.
    pub fn load_output(&mut self, raw: [u8; 6]) {
        let start = Register::OutXL.addr() as usize;
        self.regs[start..start + 6].copy_from_slice(&raw);
    }

    fn read_fails(&mut self, register: Register) -> bool {
        if self.failing_reads.contains(&register) {
            return true;
        }
        for (reg, remaining) in self.transient_reads.iter_mut() {
            if *reg == register && *remaining > 0 {
                *remaining -= 1;
                return true;
            }
        }
        false
    }
}

impl Default for SimulatedLis3dh {
    fn default() -> Self {
        Self::new()
    }
}

const NACK: Error = Error::Bus(BusFault::DataNack);

impl RegisterAccess for SimulatedLis3dh {
    async fn probe(&mut self, address: u8) -> bool {
        self.log.push(Op::Probe(address));
        (address == LIS3DH_ADDRESS && !self.detached) || self.others.contains(&address)
    }

    async fn read_register(&mut self, register: Register) -> Result<u8> {
        self.log.push(Op::Read(register));
        if self.read_fails(register) {
            return Err(NACK);
        }
        if register == Register::Status {
            match self.not_ready_polls.as_mut() {
                None => return Ok(0),
                Some(n) if *n > 0 => {
                    *n -= 1;
                    return Ok(0);
                }
                Some(_) => {}
            }
        }
        Ok(self.get(register))
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        self.log.push(Op::Write(register, value));
        if self.fail_writes {
            return Err(NACK);
        }
        let mask = self
            .write_masks
            .iter()
            .find(|(r, _)| *r == register)
            .map_or(0xFF, |(_, m)| *m);
        self.set(register, value & mask);
        Ok(())
    }

    async fn read_burst(&mut self, start: Register, buf: &mut [u8]) -> Result<()> {
        self.log.push(Op::Burst(start, buf.len()));
        if self.failing_bursts > 0 {
            self.failing_bursts -= 1;
            // Leave garbage behind, as a torn transfer would.
            buf.fill(0xEE);
            return Err(NACK);
        }
        let from = start.addr() as usize;
        buf.copy_from_slice(&self.regs[from..from + buf.len()]);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    pub events: Vec<Diagnostic>,
}

impl DiagnosticSink for RecordingDiagnostics {
    async fn report(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }
}

#[derive(Default)]
pub struct RecordingFrames {
    pub frames: Vec<WireFrame>,
}

impl FrameSink for RecordingFrames {
    async fn send(&mut self, frame: &WireFrame) {
        self.frames.push(*frame);
    }
}
