//! Fail-fast process termination with a located diagnostic.
//!
//! [`fatal`] is the single exit path for unrecoverable conditions. It never
//! returns: the report is logged, written to stderr, and the process exits
//! with [`EXIT_FAILURE`].

use std::fmt;
use std::io::{self, Write};
use std::process;

use crate::location::SourceLocation;

/// Exit status used by [`fatal`].
pub const EXIT_FAILURE: i32 = 1;

/// Tag that prefixes the message line of every fatal report.
pub const FATAL_TAG: &str = "[RY FATAL]";

/// A rendered fatal diagnostic.
///
/// Displays as two lines: the location, then the tagged message.
#[derive(Clone, Copy, Debug)]
pub struct FatalReport<'a> {
    /// Where the failure was reported.
    pub location: SourceLocation,
    /// The formatted message.
    pub message: fmt::Arguments<'a>,
}

impl fmt::Display for FatalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{FATAL_TAG}: {}", self.location, self.message)
    }
}

/// Report `message` at `location` and terminate the process.
#[cold]
#[inline(never)]
pub fn fatal(location: SourceLocation, message: fmt::Arguments<'_>) -> ! {
    let report = FatalReport { location, message };
    log::error!("{report}");

    let mut stderr = io::stderr().lock();
    // Nothing left to do if stderr itself is gone.
    let _ = writeln!(stderr, "{report}");
    let _ = stderr.flush();
    drop(stderr);

    process::exit(EXIT_FAILURE)
}

/// Report a formatted message at the invocation site and terminate the process.
///
/// ```no_run
/// let bytes = 4096;
/// ry_core::fatal!("failed to map {bytes} bytes");
/// ```
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::fatal::fatal($crate::here!(), ::std::format_args!($($arg)+))
    };
}
