//! Debouncing of modify events
//!
//! Holds a single pending note and the time its quiet period ends. Every new
//! modification restarts the period; the note is released once, when the
//! period has passed without further modifications. Time is passed in by the
//! caller so the owner decides how to wait.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Changes the quiet period for future schedules
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Starts or restarts the quiet period for `path`.
    ///
    /// A different pending note is replaced; only the active note is tracked.
    pub fn schedule(&mut self, path: &str, now: Instant) {
        self.pending = Some((path.to_string(), now + self.delay));
    }

    /// Releases the pending note if its quiet period is over
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(path, _)| path),
            _ => None,
        }
    }

    /// When the pending note is due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(path, _)| path.as_str())
    }

    /// Moves the pending note to its new path, keeping its deadline
    pub fn relocate(&mut self, old_path: &str, new_path: &str) {
        if let Some((path, _)) = &mut self.pending {
            if path == old_path {
                *path = new_path.to_string();
            }
        }
    }

    /// Drops the pending note without releasing it
    pub fn cancel(&mut self) -> Option<String> {
        self.pending.take().map(|(path, _)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a.md", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(499)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some("a.md".to_string()));
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn successive_schedules_fire_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        for step in 0..5 {
            let now = start + Duration::from_millis(step * 200);
            debouncer.schedule("a.md", now);
            assert_eq!(debouncer.poll(now), None);
        }

        let last = start + Duration::from_millis(800);
        assert_eq!(debouncer.deadline(), Some(last + DELAY));
        assert_eq!(debouncer.poll(last + DELAY - Duration::from_millis(1)), None);
        assert_eq!(debouncer.poll(last + DELAY), Some("a.md".to_string()));
        assert_eq!(debouncer.pending(), None);
    }

    #[test]
    fn new_note_replaces_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a.md", start);
        debouncer.schedule("b.md", start);

        assert_eq!(debouncer.poll(start + DELAY), Some("b.md".to_string()));
    }

    #[test]
    fn relocate_follows_renamed_note() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a.md", start);

        debouncer.relocate("other.md", "c.md");
        assert_eq!(debouncer.pending(), Some("a.md"));

        debouncer.relocate("a.md", "b.md");
        assert_eq!(debouncer.deadline(), Some(start + DELAY));
        assert_eq!(debouncer.poll(start + DELAY), Some("b.md".to_string()));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a.md", start);

        assert_eq!(debouncer.cancel(), Some("a.md".to_string()));
        assert_eq!(debouncer.poll(start + DELAY), None);
    }
}
