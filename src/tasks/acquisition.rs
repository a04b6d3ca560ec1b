use crate::acquisition::{Acquisition, CycleOutcome, Unbounded};
use crate::drivers::I2cRegisters;
use crate::ipc::{SAMPLE_DUE, TELEMETRY_CH};
use crate::telemetry::SerialLink;
use defmt::*;
use embassy_executor::task;
use embassy_stm32::{i2c::I2c, mode::Async, usart::UartTx};
use embassy_time::{Duration, Instant};

pub type FirmwareAcquisition = Acquisition<
    I2cRegisters<I2c<'static, Async>>,
    SerialLink<UartTx<'static, Async>>,
    Unbounded,
>;

#[task]
pub async fn acquisition_task(mut acq: FirmwareAcquisition) {
    info!("Acquisition task started");

    acq.run(&SAMPLE_DUE, |outcome, acq| {
        let write_errors = acq.sink().write_errors();
        // Stats are best effort; a full channel just loses a data point.
        TELEMETRY_CH
            .try_send((Instant::now(), *outcome, write_errors))
            .ok();
    })
    .await;
}

#[task]
pub async fn telemetry_stats_task() {
    info!("Telemetry stats task started");
    let mut last_sec = Instant::now();
    let mut frames = 0u32;
    let mut dropped = 0u32;
    let mut not_ready = 0u32;
    let mut last_coalesced = SAMPLE_DUE.coalesced();
    let mut last_write_errors = 0u32;

    loop {
        let (timestamp, outcome, write_errors) = TELEMETRY_CH.receive().await;
        match outcome {
            CycleOutcome::Emitted(_) => frames += 1,
            CycleOutcome::Dropped(_) => dropped += 1,
            CycleOutcome::NotReady(_) => not_ready += 1,
        }

        // Report stats every second
        if timestamp.duration_since(last_sec) >= Duration::from_secs(1) {
            let coalesced = SAMPLE_DUE.coalesced();
            info!(
                "Telemetry: {} Hz, {} dropped, {} not ready, {} coalesced, {} link errors",
                frames,
                dropped,
                not_ready,
                coalesced.wrapping_sub(last_coalesced),
                write_errors.wrapping_sub(last_write_errors)
            );
            frames = 0;
            dropped = 0;
            not_ready = 0;
            last_coalesced = coalesced;
            last_write_errors = write_errors;
            last_sec = timestamp;
        }
    }
}
