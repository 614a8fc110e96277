//! Test utilities for pathlock
//!
//! Shared helpers for tests that spawn helper processes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Get the path to a compiled example binary
///
/// Example binaries are built by `cargo test` into `target/<profile>/examples/`.
///
/// ```no_run
/// use pathlock_testkit::example_bin;
/// use std::process::Command;
///
/// let status = Command::new(example_bin("lock_holder")).status().unwrap();
/// # let _ = status;
/// ```
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    // Navigate from target/debug/deps/test_binary to target/debug/examples/
    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("examples");
    path.push(name);

    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}

/// Polls until `path` exists or `timeout` elapses
///
/// Returns whether the file appeared. Used to wait for a child process to
/// signal that it reached a given point.
pub fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if path.exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    path.exists()
}
