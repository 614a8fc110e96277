//! Advisory lock held on an open lock-file handle

use super::LockMode;
use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// An OS-level advisory lock on a lock-file.
///
/// The lock lives exactly as long as the open handle. [`FileLock::release`]
/// (or dropping the value) removes the lock-file when `cleanup` is set and
/// then closes the handle, which is what actually releases the OS lock.
#[derive(Debug)]
pub struct FileLock {
    file: Option<File>,
    path: PathBuf,
    mode: LockMode,
    cleanup: bool,
}

impl FileLock {
    /// Makes a single non-blocking attempt to lock `lock_path` in `mode`.
    ///
    /// The lock-file is created if absent and opened in append mode, so any
    /// existing content is left untouched. `lock_path` is used as-is; use
    /// [`super::lock_file_path`] to derive it from a protected resource.
    pub fn acquire(lock_path: impl AsRef<Path>, mode: LockMode) -> Result<Self> {
        Self::acquire_with_cleanup(lock_path, mode, true)
    }

    /// Makes a single non-blocking lock attempt, choosing whether release
    /// removes the lock-file.
    ///
    /// # Arguments
    ///
    /// * `lock_path` - Path of the lock-file itself (not the protected resource)
    /// * `mode` - Exclusive or shared lock
    /// * `cleanup` - Whether [`FileLock::release`] may delete the lock-file
    ///
    /// # Returns
    ///
    /// The held lock, or `Error::LockUnavailable` when the file cannot be
    /// opened or a conflicting lock is held. The attempt is never retried.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pathlock::{FileLock, LockMode};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let lock = FileLock::acquire_with_cleanup("/tmp/shared.db.lock", LockMode::Shared, false)?;
    /// // Reads of /tmp/shared.db here
    /// drop(lock); // Lock-file stays on disk
    /// # Ok(())
    /// # }
    /// ```
    pub fn acquire_with_cleanup(
        lock_path: impl AsRef<Path>,
        mode: LockMode,
        cleanup: bool,
    ) -> Result<Self> {
        let path = lock_path.as_ref().to_path_buf();

        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(source) => return Err(Error::LockUnavailable { path, source }),
        };

        // std::fs::File has inherent lock methods of its own; call fs2's explicitly.
        let locked = match mode {
            LockMode::Exclusive => FileExt::try_lock_exclusive(&file),
            LockMode::Shared => FileExt::try_lock_shared(&file),
        };

        if let Err(source) = locked {
            drop(file);
            return Err(Error::LockUnavailable { path, source });
        }

        Ok(Self {
            file: Some(file),
            path,
            mode,
            cleanup,
        })
    }

    /// Path of the lock-file (not the protected resource).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the lock was acquired in.
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn is_shared(&self) -> bool {
        self.mode == LockMode::Shared
    }

    /// Whether release will try to remove the lock-file.
    pub fn cleanup(&self) -> bool {
        self.cleanup
    }

    /// Controls whether release removes the lock-file.
    pub fn set_cleanup(&mut self, cleanup: bool) {
        self.cleanup = cleanup;
    }

    /// `true` once [`FileLock::release`] has run.
    pub fn is_released(&self) -> bool {
        self.file.is_none()
    }

    /// Releases the lock. Calling this more than once is a no-op.
    ///
    /// With `cleanup` set, an exclusive holder always removes the lock-file.
    /// A shared holder removes it only if it can upgrade to an exclusive lock,
    /// meaning no other handle still holds the file. Removal failures are
    /// ignored. The handle is closed last in every case.
    pub fn release(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        if self.cleanup {
            match self.mode {
                LockMode::Exclusive => remove_lock_file(&self.path),
                LockMode::Shared => match FileExt::try_lock_exclusive(&file) {
                    Ok(()) => remove_lock_file(&self.path),
                    Err(e) => tracing::trace!(
                        "Keeping {}: other shared holders remain ({})",
                        self.path.display(),
                        e
                    ),
                },
            }
        }

        // Closing the handle releases the OS lock
        drop(file);
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn remove_lock_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::trace!("Removed lock file {}", path.display()),
        Err(e) => tracing::debug!("Ignoring failure to remove {}: {}", path.display(), e),
    }
}
