//! Fatal and panic variants of error logging
//!
//! `fatalf` always ends the process. `panicf` unwinds instead, so a
//! boundary such as `catch_unwind` or a blocking task join can recover the
//! message and carry on.

use std::any::Any;
use std::fmt;
use std::panic::Location;

use super::error::LogError;
use super::file_writer::LogWriter;
use super::level::LogLevel;

/// Report a sink failure on stderr and exit with status 1
///
/// Uses stderr directly: the failing sink may be the only log destination.
pub(crate) fn exit_on_sink_error(err: &LogError) -> ! {
    eprintln!("ilog: {}", err);
    std::process::exit(1)
}

/// Recover the message from a panic payload raised by `panicf`
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&'static str>().copied())
}

impl LogWriter {
    /// Log at `Error`, sync the file, then exit the process with status 1
    ///
    /// The message is written whatever the threshold.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.write_unfiltered_or_exit(LogLevel::Error, args, Location::caller());
        if let Err(e) = self.flush() {
            exit_on_sink_error(&e);
        }
        std::process::exit(1)
    }

    /// Log at `Error` whatever the threshold, then panic with the same message
    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let message = args.to_string();
        self.write_unfiltered_or_exit(
            LogLevel::Error,
            format_args!("{}", message),
            Location::caller(),
        );
        std::panic::panic_any(message)
    }
}
