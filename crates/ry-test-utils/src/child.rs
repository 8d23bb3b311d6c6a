//! Re-running a test in a child process.
//!
//! Fatal paths call `process::exit`, which would take the whole test binary
//! down. A test that exercises one checks [`is_child`]: in the child it runs
//! the terminating code, in the parent it calls [`run_in_child`] and asserts
//! on the captured exit status and stderr.

use std::env;
use std::process::{Command, Output};

/// Environment variable marking the child process.
pub const CHILD_ENV: &str = "RY_TEST_FATAL_CHILD";

/// Whether this process was started by [`run_in_child`].
pub fn is_child() -> bool {
    env::var_os(CHILD_ENV).is_some()
}

/// Run the test named `test_path` (its full path inside the current test
/// binary) alone in a child process and capture its output.
///
/// # Panics
///
/// Panics if the current executable cannot be located or spawned.
pub fn run_in_child(test_path: &str) -> Output {
    let exe = env::current_exe().expect("current test executable");
    Command::new(exe)
        .arg("--exact")
        .arg(test_path)
        .arg("--nocapture")
        .arg("--test-threads=1")
        .env(CHILD_ENV, "1")
        .output()
        .expect("spawn child test process")
}
