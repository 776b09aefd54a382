//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds (UTC)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in milliseconds
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339()
}

/// Format a Unix timestamp (milliseconds) as local wall-clock time (`HH:MM:SS`).
pub fn timestamp_to_local_clock(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_current_time() {
        // given:
        let clock = SystemClock;
        let before = get_timestamp_millis();

        // when:
        let now = clock.now_millis();

        // then:
        let after = get_timestamp_millis();
        assert!(now >= before && now <= after);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_time() {
        // given:
        let clock = FixedClock::new(1_700_000_000_000);

        // when / then: always the same value
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_timestamp_to_rfc3339() {
        // given: 2023-11-14T22:13:20Z
        let timestamp = 1_700_000_000_000;

        // when:
        let result = timestamp_to_rfc3339(timestamp);

        // then:
        assert_eq!(result, "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_timestamp_to_rfc3339_keeps_milliseconds() {
        // given:
        let timestamp = 1_700_000_000_123;

        // when:
        let result = timestamp_to_rfc3339(timestamp);

        // then:
        assert_eq!(result, "2023-11-14T22:13:20.123+00:00");
    }

    #[test]
    fn test_timestamp_to_local_clock_format() {
        // given:
        let timestamp = 1_700_000_000_000;

        // when:
        let result = timestamp_to_local_clock(timestamp);

        // then: HH:MM:SS regardless of the local zone
        assert_eq!(result.len(), 8);
        assert_eq!(result.as_bytes()[2], b':');
        assert_eq!(result.as_bytes()[5], b':');
    }
}
