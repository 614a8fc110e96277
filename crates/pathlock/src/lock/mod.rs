//! Path-keyed advisory locks for cross-process mutual exclusion
//!
//! A protected resource `P` is never locked directly. Its lock lives on a
//! sibling lock-file `P.lock`, locked with the OS advisory mechanism (via
//! `fs2`) in non-blocking mode. Only processes that go through this module
//! are excluded; the resource's bytes stay freely accessible.
//!
//! # Known caveat
//!
//! Lock state is tracked per file identity, not per path. When a shared
//! holder releases and removes `P.lock`, another process may concurrently
//! create a fresh `P.lock`. Handles on the unlinked file and the new one do
//! not exclude each other, so a late acquirer can believe it is protected
//! while an earlier holder still holds the old file.

use crate::config::consts::LOCK_SUFFIX;
use std::path::{Path, PathBuf};

mod acquire;
mod file;
mod mode;
mod session;

pub use acquire::{try_acquire_with_retry, Acquisition};
pub use file::FileLock;
pub use mode::LockMode;
pub use session::{try_with_lock, with_lock};


/// Derives the lock-file path for a protected resource by appending `.lock`
/// to its full name.
///
/// # Examples
///
/// ```
/// use pathlock::lock::lock_file_path;
/// use std::path::Path;
///
/// assert_eq!(
///     lock_file_path("/srv/data/state.json"),
///     Path::new("/srv/data/state.json.lock")
/// );
/// ```
pub fn lock_file_path(resource: impl AsRef<Path>) -> PathBuf {
    let mut raw = resource.as_ref().as_os_str().to_os_string();
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}
