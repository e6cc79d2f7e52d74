use std::path::PathBuf;

use thiserror::Error;

/// Failures of the log sink itself
///
/// On the emission path every variant is fatal; `configure` and `try_log`
/// hand them back to the caller instead.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log directory not set: zero length")]
    EmptyDirectory,

    #[error("cannot make log path ({path}): {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to open log file ({path}): {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write log file ({path}): {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
