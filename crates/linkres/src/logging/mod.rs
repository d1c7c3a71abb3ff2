// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging: severity-filtered `debug!`/`info!`/`warn!`/`error!` macros for
//! ambient diagnostics, plus [`print::Logger`] for narrating a link
//! invocation's progress (worker threads reporting what they resolved,
//! the driver reporting round boundaries and final errors).
//!
//! ## Example
//!
//! ```ignore
//! use linkres::logging::{init_logger, ConsoleOutput, LogLevel};
//! use std::sync::Arc;
//!
//! let console = Arc::new(ConsoleOutput::new(LogLevel::Debug));
//! init_logger(console, LogLevel::Debug);
//!
//! debug!("Detailed info: {}", value);
//! info!("Normal operation");
//! warn!("Suspicious activity: {}", reason);
//! error!("Critical failure: {}", cause);
//! ```

pub mod logger;
mod output;
pub mod print;

pub use logger::{flush_logger, init_logger};
pub use output::{ConsoleOutput, FileOutput, LogLevel, Output};
pub use print::{LogField, Logger, Seq};

/// Debug-level log message. Formatted the same as `println!()`.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        let _ = $crate::logging::logger::log_message(
            $crate::logging::LogLevel::Debug,
            &format!($($arg)*),
        );
    };
}

/// Info-level log message. Formatted the same as `println!()`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        let _ = $crate::logging::logger::log_message(
            $crate::logging::LogLevel::Info,
            &format!($($arg)*),
        );
    };
}

/// Warning-level log message. Formatted the same as `println!()`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        let _ = $crate::logging::logger::log_message(
            $crate::logging::LogLevel::Warning,
            &format!($($arg)*),
        );
    };
}

/// Error-level log message. Formatted the same as `println!()`.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        let _ = $crate::logging::logger::log_message(
            $crate::logging::LogLevel::Error,
            &format!($($arg)*),
        );
    };
}
