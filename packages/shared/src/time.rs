//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp()
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

/// Manually driven clock for tests that need time to pass (idle sweeps, rate limits)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a fixed UTC offset from whole hours.
///
/// Returns `None` when the offset is outside ±14 hours.
pub fn fixed_offset_hours(hours: i32) -> Option<FixedOffset> {
    if !(-14..=14).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

fn to_offset_datetime(timestamp_millis: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 in the given offset
pub fn timestamp_to_rfc3339(timestamp_millis: i64, offset: FixedOffset) -> String {
    to_offset_datetime(timestamp_millis, offset).to_rfc3339()
}

/// Format a Unix timestamp (milliseconds) as a short wall-clock time, e.g. `3:45 pm`
pub fn timestamp_to_short_time(timestamp_millis: i64, offset: FixedOffset) -> String {
    to_offset_datetime(timestamp_millis, offset)
        .format("%-I:%M %P")
        .to_string()
}
