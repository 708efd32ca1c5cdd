use std::ops::Add;
use std::{
    sync::RwLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Source of the current time for samples added without an explicit time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Current time in epoch milliseconds. Times before the epoch are negative.
    fn now_millis(&self) -> i64 {
        match self.now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(err) => -(err.duration().as_millis() as i64),
        }
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug)]
pub struct MockClock {
    now: RwLock<SystemTime>,
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl MockClock {
    pub fn with_time(time: SystemTime) -> Self {
        Self {
            now: RwLock::new(time),
        }
    }

    /// Mock clock fixed at the given epoch milliseconds.
    pub fn at_millis(millis: u64) -> Self {
        Self::with_time(UNIX_EPOCH + Duration::from_millis(millis))
    }

    pub fn new() -> Self {
        Self::with_time(SystemTime::now())
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = now.add(duration);
    }

    pub fn set_time(&self, time: SystemTime) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = time;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_mock_time_in_millis() {
        // given
        let clock = MockClock::at_millis(1_500);

        // when
        clock.advance(Duration::from_millis(250));

        // then
        assert_eq!(clock.now_millis(), 1_750);
    }

    #[test]
    fn should_report_negative_millis_before_epoch() {
        // given
        let clock = MockClock::with_time(UNIX_EPOCH - Duration::from_millis(42));

        // when/then
        assert_eq!(clock.now_millis(), -42);
    }
}
