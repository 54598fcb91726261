//! Time handling for the detection core
//!
//! The monitor never reads a clock itself. Callers stamp samples and
//! transitions with a [`Timestamp`] taken from whatever [`TimeSource`]
//! suits the platform:
//! - System clock (wall time, when available)
//! - A runtime's monotonic clock (see the alerts crate's session)
//! - A fixed, manually advanced clock for tests

use core::time::Duration;

/// Timestamp in milliseconds since epoch (or since an arbitrary start for monotonic sources)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source (requires std)
///
/// Gives fall events real timestamps that alert backends can render.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing and replay
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Start the clock at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Timestamp at which a window opened at `since` closes
pub fn deadline(since: Timestamp, window: Duration) -> Timestamp {
    since.saturating_add(duration_ms(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(20);
        assert_eq!(time.now(), 20);
    }

    #[test]
    fn deadline_adds_window() {
        assert_eq!(deadline(1_000, Duration::from_secs(10)), 11_000);
        assert_eq!(deadline(u64::MAX - 1, Duration::from_secs(1)), u64::MAX);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_time_counts_from_epoch() {
        // Any date after 2020-09-13
        assert!(SystemTime.now() > 1_600_000_000_000);
    }
}
