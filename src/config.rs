// Centralize all configuration constants
pub const SAMPLE_RATE_HZ: u32 = 100;
pub const SAMPLE_PERIOD_MS: u64 = 1000 / SAMPLE_RATE_HZ as u64;
pub const UART_BAUDRATE: u32 = 115_200;
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

// LIS3DH boot procedure completes ~5 ms after power-up
pub const BOOT_DELAY_MS: u64 = 5;

// Channel sizes
pub const TELEMETRY_CHANNEL_SIZE: usize = 16;
