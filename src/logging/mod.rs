//! Leveled file logging with daily rotation
//!
//! Provides a rotating file writer with level gating and self-healing,
//! an optional color policy, fatal/panic helpers, and retention cleanup.

mod clock;
mod color;
mod error;
mod file_writer;
mod level;
mod painter;
mod retention;
mod termination;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{ColorAssociation, ColorConfigError, ColorRecord, TermColor};
pub use error::LogError;
pub use file_writer::{log_file_name, program_name, LogWriter, LoggerConfig};
pub use level::{LogLevel, UnknownLevel};
pub use painter::Painter;
pub use retention::{
    cleanup_old_logs, cleanup_old_logs_before, parse_log_file_date, DEFAULT_RETENTION_DAYS,
};
pub use termination::panic_message;

/// Log at `Mandatory`, bypassing the level threshold
#[macro_export]
macro_rules! mandatory {
    ($writer:expr, $($arg:tt)+) => {
        $writer.mandatory(::std::format_args!($($arg)+))
    };
}

/// Log at `Error` with the `ERROR - ` prefix
#[macro_export]
macro_rules! errorf {
    ($writer:expr, $($arg:tt)+) => {
        $writer.errorf(::std::format_args!($($arg)+))
    };
}

/// Log at `Warn` with the `WARN - ` prefix
#[macro_export]
macro_rules! warnf {
    ($writer:expr, $($arg:tt)+) => {
        $writer.warnf(::std::format_args!($($arg)+))
    };
}

/// Log at `Info` with the `INFO - ` prefix
#[macro_export]
macro_rules! infof {
    ($writer:expr, $($arg:tt)+) => {
        $writer.infof(::std::format_args!($($arg)+))
    };
}

/// Log at `Debug` with the `DEBUG - ` prefix
#[macro_export]
macro_rules! debugf {
    ($writer:expr, $($arg:tt)+) => {
        $writer.debugf(::std::format_args!($($arg)+))
    };
}

/// Log at `Error` and exit the process
#[macro_export]
macro_rules! fatalf {
    ($writer:expr, $($arg:tt)+) => {
        $writer.fatalf(::std::format_args!($($arg)+))
    };
}

/// Log at `Error` and panic with the message
#[macro_export]
macro_rules! panicf {
    ($writer:expr, $($arg:tt)+) => {
        $writer.panicf(::std::format_args!($($arg)+))
    };
}
