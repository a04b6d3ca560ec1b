#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use lis3dh_stream::{
    acquisition::{Acquisition, Unbounded},
    config::BOOT_DELAY_MS,
    drivers::lis3dh::{configure, I2cRegisters, LIS3DH_ADDRESS},
    tasks::{acquisition_task, sample_clock_task, telemetry_stats_task},
    telemetry::SerialLink,
    Board,
};

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn USART1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting lis3dh-stream");
    let board = Board::init();

    // Let the sensor finish its power-on boot before touching the bus.
    Timer::after(Duration::from_millis(BOOT_DELAY_MS)).await;

    let mut regs = I2cRegisters::new(board.i2c, LIS3DH_ADDRESS);
    let mut link = SerialLink::new(board.debug_tx);

    let report = configure(&mut regs, &mut link).await;
    if !report.is_ready() {
        warn!("LIS3DH setup incomplete, streaming anyway");
    }

    // Sample clock preempts the acquisition loop (USART1 vector is unused).
    interrupt::USART1.set_priority(Priority::P1);
    let spawner_high_priority = EXECUTOR_HIGH.start(interrupt::USART1);
    spawner_high_priority.spawn(sample_clock_task()).unwrap();
    info!("Sample clock spawned on interrupt executor");

    spawner.spawn(telemetry_stats_task()).unwrap();
    spawner
        .spawn(acquisition_task(Acquisition::new(regs, link, Unbounded)))
        .unwrap();
    info!("Acquisition task spawned on main executor");

    core::future::pending::<()>().await;
}
