//! Sample-due gated acquisition and framing.
//!
//! One cycle: wait for data-ready, burst-read the six output registers,
//! rebuild X/Y/Z, encode a [`WireFrame`] and hand it to the frame sink.
//! A failed burst drops the cycle without touching the sink.

use embassy_futures::yield_now;

use crate::drivers::lis3dh::{Register, RegisterAccess, BURST_LEN, STATUS_ZYXDA};
use crate::error::{Error, Result};
use crate::ipc::SampleDue;
use crate::telemetry::{FrameSink, Sample, WireFrame};
use crate::{log_debug, log_info, log_warn};

/// How the pipeline waits for the sensor's data-ready bit.
#[allow(async_fn_in_trait)]
pub trait DataReady {
    async fn wait_ready<R: RegisterAccess>(&mut self, regs: &mut R) -> Result<()>;
}

async fn poll_status<R: RegisterAccess>(regs: &mut R) -> bool {
    // A failed status read counts as "not ready yet".
    matches!(regs.read_register(Register::Status).await, Ok(s) if s & STATUS_ZYXDA != 0)
}

/// Busy-polls STATUS_REG with no timeout.
///
/// If the sensor stops producing data this never returns and the
/// acquisition loop stalls. That is a known liveness limitation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl DataReady for Unbounded {
    async fn wait_ready<R: RegisterAccess>(&mut self, regs: &mut R) -> Result<()> {
        while !poll_status(regs).await {
            yield_now().await;
        }
        Ok(())
    }
}

/// Gives up with [`Error::DeviceNotResponding`] after `max_polls` status
/// reads.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    pub max_polls: u32,
}

impl DataReady for Bounded {
    async fn wait_ready<R: RegisterAccess>(&mut self, regs: &mut R) -> Result<()> {
        for _ in 0..self.max_polls {
            if poll_status(regs).await {
                return Ok(());
            }
            yield_now().await;
        }
        Err(Error::DeviceNotResponding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum CycleOutcome {
    Emitted(WireFrame),
    /// Burst read failed; nothing was sent.
    Dropped(Error),
    /// Data-ready wait gave up; nothing was read or sent.
    NotReady(Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub struct AcquisitionStats {
    pub frames: u32,
    pub dropped: u32,
    pub not_ready: u32,
}

impl AcquisitionStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Emitted(_) => self.frames = self.frames.wrapping_add(1),
            CycleOutcome::Dropped(_) => self.dropped = self.dropped.wrapping_add(1),
            CycleOutcome::NotReady(_) => self.not_ready = self.not_ready.wrapping_add(1),
        }
    }
}

pub struct Acquisition<R, S, W = Unbounded> {
    regs: R,
    sink: S,
    ready: W,
    stats: AcquisitionStats,
}

impl<R, S, W> Acquisition<R, S, W>
where
    R: RegisterAccess,
    S: FrameSink,
    W: DataReady,
{
    pub fn new(regs: R, sink: S, ready: W) -> Self {
        Self {
            regs,
            sink,
            ready,
            stats: AcquisitionStats::default(),
        }
    }

    pub fn stats(&self) -> AcquisitionStats {
        self.stats
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// One acquisition after a sample-due firing has been taken.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = self.acquire().await;
        self.stats.record(&outcome);
        outcome
    }

    async fn acquire(&mut self) -> CycleOutcome {
        if let Err(e) = self.ready.wait_ready(&mut self.regs).await {
            log_warn!("Data-ready wait failed: {:?}", e);
            return CycleOutcome::NotReady(e);
        }

        let mut raw = [0u8; BURST_LEN];
        if let Err(e) = self.regs.read_burst(Register::OutXL, &mut raw).await {
            if self.stats.dropped % 100 == 0 {
                log_warn!("Burst read #{} failed: {:?}", self.stats.dropped + 1, e);
            }
            return CycleOutcome::Dropped(e);
        }

        let sample = Sample::from_burst(&raw);
        let frame = WireFrame::encode(&sample);
        log_debug!("Sample x={} y={} z={}", sample.x, sample.y, sample.z);

        self.sink.send(&frame).await;
        CycleOutcome::Emitted(frame)
    }

    /// Waits for the next firing, then runs one cycle.
    pub async fn service(&mut self, due: &SampleDue) -> CycleOutcome {
        due.wait().await;
        self.run_cycle().await
    }

    /// Acquisition loop; never returns. `observe` sees every cycle's outcome
    /// together with the pipeline that produced it.
    pub async fn run(&mut self, due: &SampleDue, mut observe: impl FnMut(&CycleOutcome, &Self)) {
        log_info!("Acquisition loop started");
        loop {
            let outcome = self.service(due).await;
            observe(&outcome, self);
        }
    }
}
