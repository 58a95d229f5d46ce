//! Tail view configuration.

use std::time::Duration;

/// Default number of bytes requested per log chunk (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Default cap on the accumulated log, in bytes.
pub const DEFAULT_LOG_LENGTH_LIMIT: usize = 1_000_000;

/// Default auto-refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a tail view.
#[derive(Debug, Clone)]
pub struct TailConfig {
    /// Bytes requested per log chunk. Requests near a configured cap are
    /// shrunk so the buffer never grows past it.
    pub chunk_size: usize,

    /// Stop fetching once the accumulated log reaches this many bytes, and
    /// truncate the rendered text there. `None` tails without bound.
    pub log_length_limit: Option<usize>,

    /// Auto-refresh period.
    pub poll_interval: Duration,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            log_length_limit: Some(DEFAULT_LOG_LENGTH_LIMIT),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TailConfig {
    /// Configuration that tails forever with append-only rendering.
    pub fn unbounded() -> Self {
        Self {
            log_length_limit: None,
            ..Self::default()
        }
    }

    /// Validate the configuration bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        if self.log_length_limit == Some(0) {
            return Err(ConfigError::ZeroLengthLimit);
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("log_length_limit must be greater than zero when set")]
    ZeroLengthLimit,

    #[error("poll_interval must be greater than zero")]
    ZeroPollInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TailConfig::default();
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.log_length_limit, Some(1_000_000));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unbounded_has_no_cap() {
        let config = TailConfig::unbounded();
        assert_eq!(config.log_length_limit, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = TailConfig {
            chunk_size: 0,
            ..TailConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChunkSize)));
    }

    #[test]
    fn test_zero_length_limit_rejected() {
        let config = TailConfig {
            log_length_limit: Some(0),
            ..TailConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLengthLimit)));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = TailConfig {
            poll_interval: Duration::ZERO,
            ..TailConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPollInterval)));
    }
}
