//! Default values for lock acquisition settings

/// Retry attempts made after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Pause between attempts, in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Suffix appended to a protected path to name its lock-file
pub const LOCK_SUFFIX: &str = ".lock";
