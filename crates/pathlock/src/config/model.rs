use super::consts::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use crate::lock::LockMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How often, and how patiently, an acquisition is retried.
///
/// Total attempts are `max_retries + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with `max_retries` retries after the first attempt.
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Number of attempts including the first, `max_retries + 1`.
    pub fn total_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

/// `[lock]`-style settings shared by sessions and guarded calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOptions {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(
        rename = "retry_delay_ms",
        default = "default_retry_delay",
        with = "duration_ms"
    )]
    pub retry_delay: Duration,
    #[serde(default)]
    pub shared: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: default_retry_delay(),
            shared: false,
        }
    }
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(DEFAULT_RETRY_DELAY_MS)
}

/// Reads and writes a `Duration` as whole milliseconds.
///
/// Writing rounds up, so a non-zero delay never turns into zero.
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let mut millis = delay.as_millis();
        if delay.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        serializer.serialize_u64(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

impl LockOptions {
    /// Sets how many retries follow a failed first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the pause between attempts. The `Duration` is kept as given.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Requests a shared lock instead of an exclusive one.
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// Retry settings as used by [`crate::lock::try_acquire_with_retry`].
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    /// Lock mode selected by `shared`.
    pub fn mode(&self) -> LockMode {
        if self.shared {
            LockMode::Shared
        } else {
            LockMode::Exclusive
        }
    }

    /// Parses options from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Writes options as TOML
    pub fn to_file(&self, path: impl AsRef<Path>) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_match_documented_values() {
        let options = LockOptions::default();
        assert_eq!(options.max_retries, 10);
        assert_eq!(options.retry_delay, Duration::from_secs(1));
        assert!(!options.shared);
        assert_eq!(options.mode(), LockMode::Exclusive);

        let policy = options.retry_policy();
        assert_eq!(policy, RetryPolicy::default());
        assert_eq!(policy.total_attempts(), 11);
        assert_eq!(policy.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let options = LockOptions::from_toml_str("").unwrap();
        assert_eq!(options, LockOptions::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
max_retries = 0
retry_delay_ms = 25
shared = true
"#;
        let options = LockOptions::from_toml_str(toml).unwrap();
        assert_eq!(options.max_retries, 0);
        assert_eq!(options.mode(), LockMode::Shared);
        assert_eq!(options.retry_policy().total_attempts(), 1);
        assert_eq!(
            options.retry_policy().retry_delay,
            Duration::from_millis(25)
        );
    }

    #[test]
    fn test_negative_retries_rejected() {
        let result = LockOptions::from_toml_str("max_retries = -1");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_builder_setters() {
        let options = LockOptions::default()
            .with_max_retries(3)
            .with_retry_delay(Duration::from_millis(5))
            .with_shared(true);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.retry_delay, Duration::from_millis(5));
        assert!(options.shared);
    }

    #[test]
    fn test_sub_millisecond_delay_reaches_retry_policy() {
        let options = LockOptions::default().with_retry_delay(Duration::from_micros(900));
        assert_eq!(
            options.retry_policy().retry_delay,
            Duration::from_micros(900)
        );

        let options = LockOptions::default().with_retry_delay(Duration::from_micros(2500));
        assert_eq!(
            options.retry_policy().retry_delay,
            Duration::from_micros(2500)
        );
    }

    #[test]
    fn test_saved_delay_rounds_up_to_whole_millis() {
        let options = LockOptions::default().with_retry_delay(Duration::from_micros(900));
        let content = toml::to_string(&options).unwrap();
        assert!(content.contains("retry_delay_ms = 1"), "got: {}", content);

        let reloaded = LockOptions::from_toml_str(&content).unwrap();
        assert_eq!(reloaded.retry_delay, Duration::from_millis(1));
    }

    #[test]
    fn test_total_attempts_does_not_overflow() {
        let policy = RetryPolicy::new(u32::MAX, Duration::ZERO);
        assert_eq!(policy.total_attempts(), u64::from(u32::MAX) + 1);
        assert_eq!(RetryPolicy::no_retry().total_attempts(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("lock.toml");
        let options = LockOptions::default().with_max_retries(2).with_shared(true);

        options.to_file(&path).unwrap();
        assert_eq!(LockOptions::from_file(&path).unwrap(), options);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = LockOptions::from_file(temp.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
