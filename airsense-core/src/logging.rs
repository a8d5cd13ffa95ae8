//! Optional logging shim
//!
//! The core logs through the `log` facade when the `log` feature is enabled
//! (pulled in by `std`). On bare targets the macros expand to a dead branch so
//! arguments still type-check and no formatting code is emitted.

#[cfg(feature = "log")]
macro_rules! log_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_error {
    ($($arg:tt)*) => {{ if false { let _ = core::format_args!($($arg)*); } }};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{ if false { let _ = core::format_args!($($arg)*); } }};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{ if false { let _ = core::format_args!($($arg)*); } }};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{ if false { let _ = core::format_args!($($arg)*); } }};
}
