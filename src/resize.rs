//! Resize debouncing
//!
//! Window resize events arrive in bursts while the user drags an edge. Each
//! event cancels the pending deadline and schedules a new one; the relayout
//! runs once, after the window has been quiet for the whole interval.

use std::time::{Duration, Instant};

/// Quiet interval before a pending resize fires.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a resize event at `now`, replacing any pending deadline.
    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// True exactly once per burst, at the first poll past the deadline.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Time left before the pending resize fires, if one is pending.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn idle_debouncer_never_fires() {
        let mut debouncer = ResizeDebouncer::default();
        assert!(!debouncer.has_pending());
        assert!(!debouncer.poll_at(Instant::now() + 10 * DEFAULT_RESIZE_DEBOUNCE));
    }

    #[test]
    fn fires_once_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::default();
        debouncer.schedule_at(start);

        assert!(!debouncer.poll_at(start + 249 * MS));
        assert!(debouncer.poll_at(start + 250 * MS));
        assert!(!debouncer.poll_at(start + 500 * MS));
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn burst_coalesces_into_one_fire() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::default();
        let mut fired = 0;

        // Events every 50ms for one second.
        for i in 0..20u32 {
            let now = start + i * 50 * MS;
            debouncer.schedule_at(now);
            if debouncer.poll_at(now) {
                fired += 1;
            }
        }
        let last = start + 19 * 50 * MS;
        assert_eq!(debouncer.time_until_fire(last), Some(250 * MS));
        assert!(!debouncer.poll_at(last + 200 * MS));
        if debouncer.poll_at(last + 250 * MS) {
            fired += 1;
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn cancel_drops_pending_resize() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(100 * MS);
        debouncer.schedule_at(start);
        debouncer.cancel();
        assert_eq!(debouncer.time_until_fire(start), None);
        assert!(!debouncer.poll_at(start + 200 * MS));
    }

    #[test]
    fn time_until_fire_saturates_at_zero() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(100 * MS);
        debouncer.schedule_at(start);
        assert_eq!(debouncer.time_until_fire(start + 300 * MS), Some(Duration::ZERO));
    }
}
