//! Bounded retry loop around single lock attempts

use super::{lock_file_path, FileLock, LockMode};
use crate::config::RetryPolicy;
use std::path::Path;
use std::thread;

/// Result of a retried acquisition.
#[derive(Debug)]
pub enum Acquisition {
    Held(FileLock),
    Unavailable,
}

impl Acquisition {
    /// `true` when a lock was obtained.
    pub fn is_held(&self) -> bool {
        matches!(self, Acquisition::Held(_))
    }

    /// Borrows the held lock, if any.
    pub fn as_lock(&self) -> Option<&FileLock> {
        match self {
            Acquisition::Held(lock) => Some(lock),
            Acquisition::Unavailable => None,
        }
    }

    /// Takes the held lock, if any. Dropping it releases the lock.
    pub fn into_lock(self) -> Option<FileLock> {
        match self {
            Acquisition::Held(lock) => Some(lock),
            Acquisition::Unavailable => None,
        }
    }
}

/// Tries to lock `resource` (via its `.lock` sibling) up to
/// `policy.total_attempts()` times, sleeping `policy.retry_delay` between
/// attempts.
///
/// Blocks the calling thread while it waits. Every attempt failure is
/// absorbed; exhaustion is reported as [`Acquisition::Unavailable`].
///
/// # Arguments
///
/// * `resource` - The protected path; the lock is taken on `resource.lock`
/// * `mode` - Exclusive or shared lock
/// * `policy` - Retry budget and delay between attempts
///
/// # Returns
///
/// [`Acquisition::Held`] as soon as one attempt succeeds, otherwise
/// [`Acquisition::Unavailable`] after the last attempt.
///
/// # Examples
///
/// ```no_run
/// use pathlock::lock::{try_acquire_with_retry, Acquisition, LockMode};
/// use pathlock::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(200));
/// match try_acquire_with_retry("/var/lib/app/index", LockMode::Exclusive, &policy) {
///     Acquisition::Held(lock) => {
///         // Rebuild the index here
///         drop(lock);
///     }
///     Acquisition::Unavailable => eprintln!("index is busy"),
/// }
/// ```
pub fn try_acquire_with_retry(
    resource: impl AsRef<Path>,
    mode: LockMode,
    policy: &RetryPolicy,
) -> Acquisition {
    let lock_path = lock_file_path(resource);
    let max_attempts = policy.total_attempts();

    for attempt in 1..=max_attempts {
        match FileLock::acquire(&lock_path, mode) {
            Ok(lock) => {
                tracing::trace!(
                    "Acquired {} lock on {} (attempt {})",
                    mode,
                    lock_path.display(),
                    attempt
                );
                return Acquisition::Held(lock);
            }
            Err(e) => {
                if attempt == max_attempts {
                    tracing::debug!(
                        "Giving up on {} after {} attempt(s): {}",
                        lock_path.display(),
                        attempt,
                        e
                    );
                    break;
                }

                if e.is_contended() {
                    tracing::debug!(
                        "{} is busy, retrying in {:?} ({}/{})",
                        lock_path.display(),
                        policy.retry_delay,
                        attempt,
                        max_attempts
                    );
                } else {
                    tracing::debug!(
                        "Attempt {}/{} on {} failed: {}",
                        attempt,
                        max_attempts,
                        lock_path.display(),
                        e
                    );
                }

                thread::sleep(policy.retry_delay);
            }
        }
    }

    Acquisition::Unavailable
}
