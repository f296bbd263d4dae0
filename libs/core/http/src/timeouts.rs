use serve_core::ConfigurationError;
use std::time::Duration;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection timeouts applied when serving.
///
/// - `read`: time allowed to receive request headers. On HTTP/1 the clock
///   also runs while a keep-alive connection waits for its next request, so
///   an idle HTTP/1 connection is closed once `read` elapses.
/// - `write`: time allowed to produce a response, answered with
///   `408 Request Timeout` when exceeded
/// - `idle`: HTTP/2 keep-alive ping interval. A peer that leaves a ping
///   unanswered for `idle` is disconnected; a peer that answers stays
///   connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub read: Duration,
    pub write: Duration,
    pub idle: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_TIMEOUT,
            write: DEFAULT_WRITE_TIMEOUT,
            idle: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl HttpTimeouts {
    pub fn new(read: Duration, write: Duration, idle: Duration) -> Self {
        Self { read, write, idle }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.read.is_zero() {
            return Err(ConfigurationError::ZeroTimeout("read"));
        }
        if self.write.is_zero() {
            return Err(ConfigurationError::ZeroTimeout("write"));
        }
        if self.idle.is_zero() {
            return Err(ConfigurationError::ZeroTimeout("idle"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timeouts = HttpTimeouts::default();
        assert_eq!(timeouts.read, Duration::from_secs(5));
        assert_eq!(timeouts.write, Duration::from_secs(10));
        assert_eq!(timeouts.idle, Duration::from_secs(15));
        assert!(timeouts.validate().is_ok());
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let timeouts = HttpTimeouts {
            write: Duration::ZERO,
            ..HttpTimeouts::default()
        };
        assert_eq!(
            timeouts.validate(),
            Err(ConfigurationError::ZeroTimeout("write"))
        );
    }
}
