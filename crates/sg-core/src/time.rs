//! Wall-clock timestamps for audit records

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// A clock set before 1970 reads as 0 rather than failing; audit
/// ordering then falls back to insertion order.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Whole seconds between `timestamp` and `now`, both in milliseconds.
///
/// Timestamps ahead of `now` (clock skew between gateway and client)
/// count as zero.
pub fn age_secs(now: u64, timestamp: u64) -> u64 {
    now.saturating_sub(timestamp) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_time_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(current_time_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_age_truncates_to_seconds() {
        assert_eq!(age_secs(10_999, 1_000), 9);
        assert_eq!(age_secs(5_000, 5_000), 0);
    }

    #[test]
    fn test_age_of_future_timestamp_is_zero() {
        assert_eq!(age_secs(1_000, 60_000), 0);
    }
}
