//! Trailing-edge debounce timer.
//!
//! Holds no task of its own: the owner sleeps until [`Debounce::deadline`]
//! and fires when it passes. Re-arming replaces the previous deadline, so
//! only the last edit of a burst counts.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and start a new window at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and return true if the deadline has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_starts_idle() {
        let debounce = Debounce::new(DELAY);
        assert!(!debounce.is_armed());
        assert_eq!(debounce.deadline(), None);
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);

        debounce.arm(start);
        debounce.arm(start + Duration::from_millis(200));

        assert_eq!(debounce.deadline(), Some(start + Duration::from_millis(700)));
    }

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        debounce.arm(start);

        assert!(!debounce.fire_if_due(start + Duration::from_millis(499)));
        assert!(debounce.fire_if_due(start + DELAY));
        assert!(!debounce.fire_if_due(start + DELAY * 2));
        assert!(!debounce.is_armed());
    }

    #[test]
    fn test_cancel() {
        let mut debounce = Debounce::new(DELAY);
        assert!(!debounce.cancel());

        debounce.arm(Instant::now());
        assert!(debounce.cancel());
        assert!(!debounce.is_armed());
    }
}
