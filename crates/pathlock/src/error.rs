use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Lock errors
    #[error("LOCK_UNAVAILABLE: couldn't lock {}", .path.display())]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("CONFIG_SERIALIZE_ERROR: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` when a lock attempt failed only because another
    /// handle already holds a conflicting lock.
    pub fn is_contended(&self) -> bool {
        match self {
            Error::LockUnavailable { source, .. } => {
                source.kind() == std::io::ErrorKind::WouldBlock
                    || source.raw_os_error() == fs2::lock_contended_error().raw_os_error()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unavailable_message_names_path() {
        let err = Error::LockUnavailable {
            path: PathBuf::from("/tmp/resource.lock"),
            source: io::Error::new(io::ErrorKind::WouldBlock, "busy"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("LOCK_UNAVAILABLE"), "got: {}", msg);
        assert!(msg.contains("/tmp/resource.lock"), "got: {}", msg);
    }

    #[test]
    fn test_contention_detected_from_would_block() {
        let err = Error::LockUnavailable {
            path: PathBuf::from("x.lock"),
            source: fs2::lock_contended_error(),
        };
        assert!(err.is_contended());
    }

    #[test]
    fn test_permission_failure_is_not_contention() {
        let err = Error::LockUnavailable {
            path: PathBuf::from("x.lock"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_contended());

        let io_err = Error::Io(io::Error::other("disk"));
        assert!(!io_err.is_contended());
    }
}
