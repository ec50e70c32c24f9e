// ABOUTME: Utilities for working with timestamps carried by stat records.
// ABOUTME: Provides epoch-millisecond conversion, RFC3339 formatting and monotonic timers.
use ::time::{format_description::well_known::Rfc3339, OffsetDateTime};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, negative for instants before it
///
/// # Examples
///
/// ```
/// use dp_core::epoch_millis;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let time = UNIX_EPOCH + Duration::from_millis(1_609_459_200_123);
/// assert_eq!(epoch_millis(time), 1_609_459_200_123.0);
/// ```
pub fn epoch_millis(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_millis() as f64,
        Err(before) => -(before.duration().as_millis() as f64),
    }
}

/// Convert a SystemTime to an RFC3339 timestamp string
///
/// # Examples
///
/// ```
/// use dp_core::to_rfc3339;
/// use std::time::{UNIX_EPOCH, Duration};
///
/// let time = UNIX_EPOCH + Duration::from_secs(1_609_459_200); // 2021-01-01
/// assert_eq!(to_rfc3339(time), "2021-01-01T00:00:00Z");
/// ```
pub fn to_rfc3339(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Measures how long a scrape takes
pub struct MonotonicTimer {
    start: Instant,
}

impl MonotonicTimer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time since creation
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time in fractional milliseconds, for log fields
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for MonotonicTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_epoch_millis_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(epoch_millis(time), -1500.0);
    }

    #[test]
    fn test_epoch_millis_truncates_sub_millisecond() {
        let time = UNIX_EPOCH + Duration::from_micros(2_999);
        assert_eq!(epoch_millis(time), 2.0);
    }

    #[test]
    fn test_to_rfc3339() {
        let time = UNIX_EPOCH + Duration::from_secs(1_609_459_200); // 2021-01-01
        assert_eq!(to_rfc3339(time), "2021-01-01T00:00:00Z");
    }

    #[test]
    fn test_monotonic_timer() {
        let timer = MonotonicTimer::new();
        thread::sleep(Duration::from_millis(1));
        assert!(timer.elapsed() >= Duration::from_millis(1));
        assert!(timer.elapsed_millis() >= 1.0);
    }
}
