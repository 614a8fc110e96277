//! Scoped acquisition: run a block while holding the lock

use super::{try_acquire_with_retry, Acquisition, FileLock};
use crate::config::LockOptions;
use std::path::Path;

/// Runs `f` with the lock on `resource`, or with `None` when the retry
/// budget runs out.
///
/// A held lock is released exactly once when this returns, including when
/// `f` panics.
///
/// # Arguments
///
/// * `resource` - The protected path; the lock is taken on `resource.lock`
/// * `options` - Retry budget, delay and lock mode
/// * `f` - The protected block; receives `None` when no lock was obtained
///
/// # Returns
///
/// Whatever `f` returns.
///
/// # Examples
///
/// ```no_run
/// use pathlock::{with_lock, LockOptions};
///
/// let options = LockOptions::default().with_max_retries(3);
/// let updated = with_lock("/var/lib/app/state.json", &options, |lock| match lock {
///     Some(_) => std::fs::write("/var/lib/app/state.json", "{}").is_ok(),
///     None => false,
/// });
/// # let _ = updated;
/// ```
pub fn with_lock<R>(
    resource: impl AsRef<Path>,
    options: &LockOptions,
    f: impl FnOnce(Option<&FileLock>) -> R,
) -> R {
    let lock =
        try_acquire_with_retry(resource, options.mode(), &options.retry_policy()).into_lock();
    f(lock.as_ref())
}

/// Like [`with_lock`], but fails with `on_unavailable(resource)` instead of
/// running `f` when no lock could be obtained.
pub fn try_with_lock<R, E>(
    resource: impl AsRef<Path>,
    options: &LockOptions,
    on_unavailable: impl FnOnce(&Path) -> E,
    f: impl FnOnce(&FileLock) -> R,
) -> Result<R, E> {
    let resource = resource.as_ref();
    match try_acquire_with_retry(resource, options.mode(), &options.retry_policy()) {
        Acquisition::Held(lock) => Ok(f(&lock)),
        Acquisition::Unavailable => Err(on_unavailable(resource)),
    }
}
