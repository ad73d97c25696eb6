use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// What the main loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Terminal size changed; the next frame is painted from scratch
    Resize,
    /// Whole game seconds elapsed since the previous report
    Seconds(u32),
    /// Nothing arrived within the poll interval
    Idle,
}

/// Source of terminal input
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for a key press or resize
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows reports releases too; only presses drive the game
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for driving the app without a terminal
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Merges terminal input with the one-second game clock.
///
/// Elapsed seconds are measured against wall time, so a burst of key presses
/// delays the report but never loses a second.
pub struct Runner<E: AppEventSource> {
    event_source: E,
    poll: Duration,
    clock: SecondClock,
}

impl<E: AppEventSource> Runner<E> {
    pub fn new(event_source: E, poll: Duration) -> Self {
        Self {
            event_source,
            poll,
            clock: SecondClock::started_at(Instant::now()),
        }
    }

    /// Count game seconds from `now`, e.g. when a round starts
    pub fn restart_clock(&mut self, now: Instant) {
        self.clock = SecondClock::started_at(now);
    }

    /// Reports elapsed seconds first, otherwise waits up to the poll interval for input
    pub fn step(&mut self, now: Instant) -> AppEvent {
        match self.clock.poll(now) {
            0 => {}
            seconds => return AppEvent::Seconds(seconds),
        }
        let wait = self.poll.min(self.clock.until_next(now));
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SecondClock {
    next: Instant,
}

impl SecondClock {
    fn started_at(now: Instant) -> Self {
        Self {
            next: now + Duration::from_secs(1),
        }
    }

    /// Number of whole seconds that completed up to `now`
    fn poll(&mut self, now: Instant) -> u32 {
        let mut seconds = 0;
        while now >= self.next {
            self.next += Duration::from_secs(1);
            seconds += 1;
        }
        seconds
    }

    fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    fn runner(poll_ms: u64) -> (mpsc::Sender<AppEvent>, Runner<TestEventSource>, Instant) {
        let (tx, rx) = mpsc::channel();
        let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(poll_ms));
        let t0 = Instant::now();
        runner.restart_clock(t0);
        (tx, runner, t0)
    }

    #[test]
    fn idle_until_a_second_has_passed() {
        let (_tx, mut runner, t0) = runner(1);
        assert_eq!(runner.step(t0), AppEvent::Idle);
        assert_eq!(runner.step(t0 + Duration::from_millis(999)), AppEvent::Idle);
        assert_eq!(runner.step(t0 + Duration::from_secs(1)), AppEvent::Seconds(1));
        assert_eq!(runner.step(t0 + Duration::from_millis(1500)), AppEvent::Idle);
    }

    #[test]
    fn late_step_reports_every_missed_second() {
        let (_tx, mut runner, t0) = runner(1);
        assert_eq!(runner.step(t0 + Duration::from_millis(3200)), AppEvent::Seconds(3));
        assert_eq!(runner.step(t0 + Duration::from_millis(3900)), AppEvent::Idle);
        assert_eq!(runner.step(t0 + Duration::from_secs(4)), AppEvent::Seconds(1));
    }

    #[test]
    fn due_seconds_come_before_queued_keys() {
        let (tx, mut runner, t0) = runner(10);
        let key = AppEvent::Key(KeyEvent::new(KeyCode::Char('к'), KeyModifiers::NONE));
        tx.send(key.clone()).unwrap();
        tx.send(AppEvent::Resize).unwrap();

        assert_eq!(runner.step(t0 + Duration::from_secs(2)), AppEvent::Seconds(2));
        assert_eq!(runner.step(t0 + Duration::from_secs(2)), key);
        assert_eq!(runner.step(t0 + Duration::from_secs(2)), AppEvent::Resize);
    }

    #[test]
    fn restarting_the_clock_drops_the_partial_second() {
        let (_tx, mut runner, t0) = runner(1);
        runner.restart_clock(t0 + Duration::from_millis(900));
        assert_eq!(runner.step(t0 + Duration::from_millis(1200)), AppEvent::Idle);
        assert_eq!(runner.step(t0 + Duration::from_millis(1900)), AppEvent::Seconds(1));
    }
}
