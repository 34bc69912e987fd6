use std::time::{Duration, Instant};

/// Fixed-interval deadline tracker. Ticks that pass while a cycle is still
/// running are dropped, never queued.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// Arm the first tick one interval after `start`.
    pub fn new(interval: Duration, start: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Time left until the next tick, zero if it is already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Move the deadline to the first tick strictly after `now`. Returns how
    /// many ticks were skipped besides the one just serviced.
    pub fn rearm(&mut self, now: Instant) -> u32 {
        let mut skipped: u32 = 0;
        while self.next <= now {
            self.next += self.interval;
            skipped += 1;
        }
        skipped.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECS_45: Duration = Duration::from_secs(45);

    #[test]
    fn test_first_deadline_is_one_interval_out() {
        let start = Instant::now();
        let ticker = Ticker::new(SECS_45, start);

        assert_eq!(ticker.deadline(), start + SECS_45);
        assert_eq!(ticker.remaining(start), SECS_45);
    }

    #[test]
    fn test_rearm_after_on_time_cycle() {
        let start = Instant::now();
        let mut ticker = Ticker::new(SECS_45, start);

        // Tick at 45s, cycle finishes at 50s.
        let skipped = ticker.rearm(start + Duration::from_secs(50));
        assert_eq!(skipped, 0);
        assert_eq!(ticker.deadline(), start + Duration::from_secs(90));
    }

    #[test]
    fn test_rearm_drops_ticks_missed_by_long_cycle() {
        let start = Instant::now();
        let mut ticker = Ticker::new(SECS_45, start);

        // Cycle started at 45s and ran until 200s: ticks at 90, 135, 180 are dropped.
        let skipped = ticker.rearm(start + Duration::from_secs(200));
        assert_eq!(skipped, 3);
        assert_eq!(ticker.deadline(), start + Duration::from_secs(225));
    }

    #[test]
    fn test_rearm_before_deadline_is_noop() {
        let start = Instant::now();
        let mut ticker = Ticker::new(SECS_45, start);

        // The immediate first cycle finished quickly.
        assert_eq!(ticker.rearm(start + Duration::from_secs(3)), 0);
        assert_eq!(ticker.deadline(), start + SECS_45);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let ticker = Ticker::new(Duration::ZERO, Instant::now());
        assert_eq!(ticker.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_remaining_saturates() {
        let start = Instant::now();
        let ticker = Ticker::new(SECS_45, start);
        assert_eq!(ticker.remaining(start + Duration::from_secs(60)), Duration::ZERO);
    }
}
