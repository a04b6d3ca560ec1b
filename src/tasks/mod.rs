pub mod acquisition;
pub mod sample_clock;

pub use acquisition::{acquisition_task, telemetry_stats_task, FirmwareAcquisition};
pub use sample_clock::sample_clock_task;

