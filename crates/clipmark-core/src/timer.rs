//! Cancelable one-shot timers driven by the host event loop.
//!
//! The editor never spawns threads. A timer only records a deadline and a
//! payload; the host calls [`OneShotTimer::poll`] from its frame or tick
//! handler and the payload comes back once the deadline has passed.
//! Scheduling a new payload always drops the previous one, so there is at
//! most one pending firing per timer.

use std::time::{Duration, Instant};

/// A single pending deadline carrying a payload.
#[derive(Debug, Clone)]
pub struct OneShotTimer<T> {
    pending: Option<(Instant, T)>,
}

impl<T> OneShotTimer<T> {
    /// Create an idle timer.
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the timer to fire `delay` after `now`.
    ///
    /// Returns the payload of a previously armed firing, which is cancelled.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> Option<T> {
        self.pending
            .replace((now + delay, payload))
            .map(|(_, previous)| previous)
    }

    /// Disarm the timer, returning the payload that would have fired.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    /// Return the payload if the deadline has been reached, disarming the timer.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.cancel(),
            _ => None,
        }
    }

    /// Check if a firing is pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the pending payload.
    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, payload)| payload)
    }

    /// Time left before the deadline, zero if already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }
}

impl<T> Default for OneShotTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fires_after_deadline() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(t0, MS * 100, "commit");

        assert_eq!(timer.poll(t0 + MS * 99), None);
        assert!(timer.is_pending());
        assert_eq!(timer.poll(t0 + MS * 100), Some("commit"));
        assert!(!timer.is_pending());
        assert_eq!(timer.poll(t0 + MS * 500), None);
    }

    #[test]
    fn test_reschedule_replaces_payload() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        assert_eq!(timer.schedule(t0, MS * 100, 1), None);
        assert_eq!(timer.schedule(t0 + MS * 50, MS * 100, 2), Some(1));

        // The first deadline no longer applies.
        assert_eq!(timer.poll(t0 + MS * 120), None);
        assert_eq!(timer.poll(t0 + MS * 150), Some(2));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(t0, MS * 10, 'x');
        assert_eq!(timer.payload(), Some(&'x'));
        assert_eq!(timer.cancel(), Some('x'));
        assert_eq!(timer.poll(t0 + MS * 20), None);
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        assert_eq!(timer.remaining(t0), None);
        timer.schedule(t0, MS * 40, ());
        assert_eq!(timer.remaining(t0 + MS * 10), Some(MS * 30));
        assert_eq!(timer.remaining(t0 + MS * 90), Some(Duration::ZERO));
    }
}
