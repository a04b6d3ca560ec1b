use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{Config as UsartConfig, UartTx};
use embassy_stm32::{bind_interrupts, i2c, peripherals, rcc, Config};

use crate::config::{I2C_FREQUENCY_HZ, UART_BAUDRATE};

// ── IRQ table ─────────────────────────────────────────────
bind_interrupts!(pub struct Irqs {
    I2C2 => i2c::EventInterruptHandler<peripherals::I2C2>,
            i2c::ErrorInterruptHandler<peripherals::I2C2>;
});

// ── Board struct ──────────────────────────────────────────
pub struct Board {
    pub i2c: i2c::I2c<'static, Async>, // DMA, LIS3DH bus
    pub debug_tx: UartTx<'static, Async>, // DMA, frames + diagnostics
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();

        // HSI 16MHz -> PLL -> 64MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,    // Use HSI as PLL source
            prediv: rcc::PllPreDiv::DIV2,   // 16MHz / 2 = 8MHz
            mul: rcc::PllMul::MUL16,        // 8MHz * 16 = 128MHz
            divp: None,                     // Not used
            divq: None,                     // Not used
            divr: Some(rcc::PllRDiv::DIV2), // 128MHz / 2 = 64MHz
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // Debug link on the Nucleo VCP (USART2 TX = PA2). TX only.
        let mut us_cfg = UsartConfig::default();
        us_cfg.baudrate = UART_BAUDRATE;
        let debug_tx = UartTx::new(p.USART2, p.PA2, p.DMA1_CH1, us_cfg).unwrap();

        // I²C2 (DMA CH7 TX, CH6 RX), external pull-ups on the sensor board
        let mut i2c_cfg = i2c::Config::default();
        i2c_cfg.sda_pullup = false;
        i2c_cfg.scl_pullup = false;

        let i2c = i2c::I2c::new(
            p.I2C2,
            p.PB10,
            p.PB11,
            Irqs,
            p.DMA1_CH7,
            p.DMA1_CH6,
            Hertz(I2C_FREQUENCY_HZ),
            i2c_cfg,
        );

        Self { i2c, debug_tx }
    }
}
