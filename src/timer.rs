//! Deferred timers and reveal schedules owned by screen state.
//!
//! Nothing here runs on its own. The event loop feeds the current instant
//! in and screens ask whether something is due. A timer lives inside the
//! screen that armed it; when the screen is replaced the timer is dropped
//! with it and can never fire.

use std::time::{Duration, Instant};

// ============================================================================
// DEFERRED
// ============================================================================

/// A one-shot timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred {
    due: Instant,
    fired: bool,
}

impl Deferred {
    /// Arm a timer that becomes due `delay` after `start`.
    pub fn after(start: Instant, delay: Duration) -> Self {
        Deferred {
            due: start + delay,
            fired: false,
        }
    }

    /// Returns true exactly once: the first time it is polled at or after
    /// its due instant.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.fired || now < self.due {
            return false;
        }
        self.fired = true;
        true
    }

    /// Time left until due (zero once due).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

// ============================================================================
// TYPEWRITER
// ============================================================================

/// Character-by-character text reveal, one char per `interval`.
///
/// Stateless: the visible prefix is a function of elapsed time only,
/// so there is no interval to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    text: &'static str,
    interval: Duration,
}

impl Typewriter {
    pub const fn new(text: &'static str, interval: Duration) -> Self {
        Typewriter { text, interval }
    }

    /// Prefix of the text visible after `elapsed`.
    pub fn visible(&self, elapsed: Duration) -> &'static str {
        let shown = self.chars_shown(elapsed);
        match self.text.char_indices().nth(shown) {
            Some((byte, _)) => &self.text[..byte],
            None => self.text,
        }
    }

    /// Whether the full text is on screen.
    pub fn finished(&self, elapsed: Duration) -> bool {
        self.chars_shown(elapsed) >= self.text.chars().count()
    }

    fn chars_shown(&self, elapsed: Duration) -> usize {
        if self.interval.is_zero() {
            return usize::MAX;
        }
        (elapsed.as_millis() / self.interval.as_millis().max(1)) as usize
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn deferred_not_due_before_delay() {
        let start = Instant::now();
        let mut timer = Deferred::after(start, ms(3000));
        assert!(!timer.poll(start));
        assert!(!timer.poll(start + ms(2999)));
        assert!(timer.poll(start + ms(3000)));
    }

    #[test]
    fn deferred_fires_exactly_once() {
        let start = Instant::now();
        let mut timer = Deferred::after(start, ms(1400));
        assert!(timer.poll(start + ms(1400)));
        assert!(!timer.poll(start + ms(1500)));
        assert!(!timer.poll(start + ms(9000)));
    }

    #[test]
    fn deferred_late_poll_still_fires() {
        let start = Instant::now();
        let mut timer = Deferred::after(start, ms(100));
        assert!(timer.poll(start + ms(5000)));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let start = Instant::now();
        let timer = Deferred::after(start, ms(500));
        assert_eq!(timer.remaining(start + ms(200)), ms(300));
        assert_eq!(timer.remaining(start + ms(900)), Duration::ZERO);
    }

    #[test]
    fn typewriter_reveals_one_char_per_interval() {
        let tw = Typewriter::new("Loading", ms(80));
        assert_eq!(tw.visible(ms(0)), "");
        assert_eq!(tw.visible(ms(79)), "");
        assert_eq!(tw.visible(ms(80)), "L");
        assert_eq!(tw.visible(ms(240)), "Loa");
        assert!(!tw.finished(ms(480)));
        assert_eq!(tw.visible(ms(560)), "Loading");
        assert!(tw.finished(ms(560)));
        assert_eq!(tw.visible(ms(60_000)), "Loading");
    }

    #[test]
    fn typewriter_respects_multibyte_chars() {
        let tw = Typewriter::new("a❄b", ms(10));
        assert_eq!(tw.visible(ms(10)), "a");
        assert_eq!(tw.visible(ms(20)), "a❄");
        assert_eq!(tw.visible(ms(30)), "a❄b");
    }
}
