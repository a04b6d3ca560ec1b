//! Logging macros shared by the firmware and host builds
//!
//! - `firmware` feature: forwards to `defmt` (RTT transport)
//! - host unit tests: `println!` with a level prefix
//! - any other host build: arguments are type-checked and dropped
//!
//! Format strings must stay in the subset both `defmt` and `core::fmt`
//! accept (`{}`, `{:?}`, `{:02X}`).

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "firmware")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "firmware"), test))]
        println!("[INFO]  {}", format_args!($($arg)*));

        #[cfg(all(not(feature = "firmware"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "firmware")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "firmware"), test))]
        println!("[WARN]  {}", format_args!($($arg)*));

        #[cfg(all(not(feature = "firmware"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "firmware")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "firmware"), test))]
        println!("[ERROR] {}", format_args!($($arg)*));

        #[cfg(all(not(feature = "firmware"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "firmware")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "firmware"), test))]
        println!("[DEBUG] {}", format_args!($($arg)*));

        #[cfg(all(not(feature = "firmware"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
