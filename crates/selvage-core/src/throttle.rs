//! Leading + trailing throttle for `selectionchange`.

use std::time::Duration;

use web_time::Instant;

/// What the caller should do with a throttled call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleAction {
    /// Run now (leading edge, or the interval has passed).
    RunNow,
    /// Schedule one trailing run after the delay, then call
    /// [`Throttle::fire_trailing`].
    ScheduleTrailing(Duration),
    /// A trailing run is already scheduled and will cover this call.
    AlreadyScheduled,
}

/// Throttle state machine. Time is passed in, so the caller owns the timer.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn call(&mut self, now: Instant) -> ThrottleAction {
        if self.trailing {
            return ThrottleAction::AlreadyScheduled;
        }
        let elapsed = self
            .last_run
            .map(|last| now.saturating_duration_since(last));
        match elapsed {
            Some(elapsed) if elapsed < self.interval => {
                self.trailing = true;
                ThrottleAction::ScheduleTrailing(self.interval - elapsed)
            }
            _ => {
                self.last_run = Some(now);
                ThrottleAction::RunNow
            }
        }
    }

    /// Mark the scheduled trailing run as done. Returns `false` if it was
    /// cancelled in the meantime.
    pub fn fire_trailing(&mut self, now: Instant) -> bool {
        if !self.trailing {
            return false;
        }
        self.trailing = false;
        self.last_run = Some(now);
        true
    }

    pub fn cancel(&mut self) {
        self.trailing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_then_trailing() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::now();

        assert_eq!(throttle.call(start), ThrottleAction::RunNow);
        assert_eq!(
            throttle.call(start + Duration::from_millis(30)),
            ThrottleAction::ScheduleTrailing(Duration::from_millis(70))
        );
        assert_eq!(
            throttle.call(start + Duration::from_millis(60)),
            ThrottleAction::AlreadyScheduled
        );

        assert!(throttle.fire_trailing(start + Duration::from_millis(100)));
        assert!(!throttle.fire_trailing(start + Duration::from_millis(101)));
        assert_eq!(
            throttle.call(start + Duration::from_millis(250)),
            ThrottleAction::RunNow
        );
    }

    #[test]
    fn test_cancel_drops_trailing() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::now();
        throttle.call(start);
        throttle.call(start + Duration::from_millis(10));
        throttle.cancel();
        assert!(!throttle.fire_trailing(start + Duration::from_millis(100)));
    }
}
