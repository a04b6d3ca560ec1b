use crate::config::{SAMPLE_PERIOD_MS, SAMPLE_RATE_HZ};
use crate::ipc::SAMPLE_DUE;
use defmt::*;
use embassy_executor::task;
use embassy_time::{Duration, Ticker};

/// Periodic "sample due" source. Spawned on the interrupt-priority executor
/// so it preempts the acquisition loop the way a timer ISR would; its only
/// side effect is raising the flag.
#[task]
pub async fn sample_clock_task() {
    info!(
        "Sample clock started - {} Hz ({}ms period)",
        SAMPLE_RATE_HZ, SAMPLE_PERIOD_MS
    );
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));

    loop {
        ticker.next().await;
        SAMPLE_DUE.raise();
    }
}
