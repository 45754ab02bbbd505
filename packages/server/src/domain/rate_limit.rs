//! Per-connection chat rate limiting.

use std::time::Duration;

use super::value_object::Timestamp;

/// Default minimum interval between two chat messages of one connection
pub const DEFAULT_MIN_MESSAGE_INTERVAL: Duration = Duration::from_millis(500);

/// At most one chat message per `min_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    min_interval: Duration,
}

impl RateLimitPolicy {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Check a submission at `now` against the previous accepted one.
    ///
    /// Returns `Err(retry_after_ms)` when the submission comes too early.
    pub fn check(&self, last_message_at: Option<Timestamp>, now: Timestamp) -> Result<(), i64> {
        let Some(last) = last_message_at else {
            return Ok(());
        };

        let min_interval_ms = i64::try_from(self.min_interval.as_millis()).unwrap_or(i64::MAX);
        let elapsed = now.millis_since(last);
        if elapsed < min_interval_ms {
            return Err(min_interval_ms - elapsed.max(0));
        }
        Ok(())
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_MESSAGE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_is_always_allowed() {
        // テスト項目: 過去の送信がなければ常に許可される
        // given (前提条件):
        let policy = RateLimitPolicy::default();

        // when (操作):
        let result = policy.check(None, Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_message_inside_interval_is_rejected() {
        // テスト項目: 最小間隔内の送信は拒否され、残り時間が返される
        // given (前提条件):
        let policy = RateLimitPolicy::new(Duration::from_millis(500));
        let last = Some(Timestamp::new(1_000));

        // when (操作):
        let result = policy.check(last, Timestamp::new(1_200));

        // then (期待する結果):
        assert_eq!(result, Err(300));
    }

    #[test]
    fn test_message_at_interval_boundary_is_allowed() {
        // テスト項目: ちょうど最小間隔が経過した送信は許可される
        // given (前提条件):
        let policy = RateLimitPolicy::new(Duration::from_millis(500));
        let last = Some(Timestamp::new(1_000));

        // when (操作):
        let result = policy.check(last, Timestamp::new(1_500));

        // then (期待する結果):
        assert_eq!(result, Ok(()));
    }
}
