/// Whole-second countdown owned by a game session.
///
/// It only moves when [`Countdown::tick`] is called; the caller decides how real time maps
/// onto ticks. Stopping keeps the remaining time so it can still be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    time_left: u32,
    base: u32,
    active: bool,
}

impl Countdown {
    /// A running countdown starting at `base` seconds
    pub fn new(base: u32) -> Self {
        Self {
            time_left: base,
            base,
            active: true,
        }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_expired(&self) -> bool {
        self.time_left == 0
    }

    /// Remove one second. Returns false when nothing changed (stopped or already at zero).
    pub fn tick(&mut self) -> bool {
        if !self.active || self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        true
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn restart(&mut self) {
        self.time_left = self.base;
        self.active = true;
    }

    /// Add `secs` without going above `cap`; returns the seconds actually added
    pub fn add_capped(&mut self, secs: u32, cap: u32) -> u32 {
        let before = self.time_left;
        self.time_left = self.time_left.saturating_add(secs).min(cap).max(before);
        self.time_left - before
    }
}

/// Render seconds as `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_down_to_zero_and_stays() {
        let mut t = Countdown::new(2);
        assert!(t.tick());
        assert!(t.tick());
        assert!(t.is_expired());
        assert!(!t.tick());
        assert_eq!(t.time_left(), 0);
    }

    #[test]
    fn stopped_countdown_keeps_remaining_time() {
        let mut t = Countdown::new(10);
        t.tick();
        t.stop();
        assert!(!t.tick());
        assert_eq!(t.time_left(), 9);
        assert!(!t.is_active());
    }

    #[test]
    fn restart_returns_to_base_and_reactivates() {
        let mut t = Countdown::new(60);
        for _ in 0..15 {
            t.tick();
        }
        t.stop();
        t.restart();
        assert_eq!(t.time_left(), 60);
        assert!(t.is_active());
    }

    #[test]
    fn add_capped_respects_the_cap() {
        let mut t = Countdown::new(60);
        assert_eq!(t.add_capped(5, 60), 0);
        for _ in 0..3 {
            t.tick();
        }
        assert_eq!(t.add_capped(5, 60), 3);
        assert_eq!(t.time_left(), 60);
        for _ in 0..10 {
            t.tick();
        }
        assert_eq!(t.add_capped(5, 60), 5);
        assert_eq!(t.time_left(), 55);
    }

    #[test]
    fn add_capped_never_lowers_time_above_cap() {
        let mut t = Countdown::new(300);
        assert_eq!(t.add_capped(5, 60), 0);
        assert_eq!(t.time_left(), 300);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(300), "5:00");
        assert_eq!(format_time(125), "2:05");
        assert_eq!(format_time(9), "0:09");
    }
}
