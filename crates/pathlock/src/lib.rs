//! Cross-process mutual exclusion over filesystem paths
//!
//! Cooperating processes protect a resource `P` by taking an OS advisory
//! lock on `P.lock`. Locks are exclusive or shared, acquisition is retried
//! with a fixed delay, and a held lock is always released when its scope
//! ends. The layers, lowest first:
//!
//! - [`lock::FileLock`]: one non-blocking lock attempt and its release
//! - [`lock::try_acquire_with_retry`]: bounded retries
//! - [`lock::with_lock`] / [`lock::try_with_lock`]: scoped acquisition
//! - [`guard::Guarded`]: wrap a function so it only runs under the lock
//!
//! Locking is local to one filesystem. There are no leases, fencing tokens
//! or network coordination.

// Core modules
pub mod config;
pub mod error;
pub mod guard;
pub mod lock;

// Re-export commonly used types
pub use config::{LockOptions, RetryPolicy};
pub use error::{Error, Result};
pub use guard::{guard, guard_by_first_arg, Guarded};
pub use lock::{lock_file_path, try_with_lock, with_lock, Acquisition, FileLock, LockMode};
