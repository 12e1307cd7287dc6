//! Per-stage diagnostics on stderr.
//!
//! Stage-internal failures are reported here and never stop the pipeline.

use std::fmt::Display;
use std::io::{self, Write};

/// Writes `[ERROR][<plugin>] - <message>` to stderr.
pub fn log_error(plugin: &str, message: impl Display) {
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "[ERROR][{plugin}] - {message}");
    let _ = err.flush();
}

/// Writes `[INFO][<plugin>] - <message>` to stderr.
pub fn log_info(plugin: &str, message: impl Display) {
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "[INFO][{plugin}] - {message}");
    let _ = err.flush();
}
