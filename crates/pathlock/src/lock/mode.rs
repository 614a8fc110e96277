use std::fmt;

/// Kind of advisory lock requested on a lock-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockMode {
    /// Excludes every other holder, shared or exclusive.
    #[default]
    Exclusive,
    /// Coexists with other shared holders; excludes exclusive ones.
    Shared,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Exclusive => f.write_str("exclusive"),
            LockMode::Shared => f.write_str("shared"),
        }
    }
}
