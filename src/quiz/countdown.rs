//! Quiz countdown
//!
//! Remaining time is derived from the limit and whole seconds elapsed. The
//! urgency tier only ever moves forward, and expiry is reported exactly once.

/// Remaining seconds at or below which the timer turns to warning.
pub const WARNING_THRESHOLD_SECS: u64 = 5 * 60;

/// Remaining seconds at or below which the timer turns to danger.
pub const DANGER_THRESHOLD_SECS: u64 = 60;

/// Visual urgency tier of the timer. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
    Normal,
    Warning,
    Danger,
    Expired,
}

impl Urgency {
    /// Tier for a number of remaining seconds while the clock still runs.
    pub fn for_remaining(remaining_secs: u64) -> Self {
        if remaining_secs <= DANGER_THRESHOLD_SECS {
            Urgency::Danger
        } else if remaining_secs <= WARNING_THRESHOLD_SECS {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Warning => "warning",
            Urgency::Danger => "danger",
            Urgency::Expired => "expired",
        }
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// What a clock update produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still counting down
    Running {
        remaining: u64,
        urgency: Urgency,
        /// The urgency tier changed on this update
        escalated: bool,
    },
    /// Time just ran out. Returned once per countdown.
    Expired,
    /// The countdown already finished or was stopped
    Stopped,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    limit_secs: u64,
    elapsed_secs: u64,
    urgency: Urgency,
    running: bool,
}

impl Countdown {
    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_secs(u64::from(minutes) * 60)
    }

    pub fn from_secs(limit_secs: u64) -> Self {
        Self {
            limit_secs,
            elapsed_secs: 0,
            urgency: Urgency::for_remaining(limit_secs),
            running: true,
        }
    }

    pub fn limit_secs(&self) -> u64 {
        self.limit_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.limit_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time as `m:ss`
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs())
    }

    /// State as of now, without moving the clock
    pub fn current(&self) -> Tick {
        if self.running {
            Tick::Running {
                remaining: self.remaining_secs(),
                urgency: self.urgency,
                escalated: false,
            }
        } else {
            Tick::Stopped
        }
    }

    /// Move forward by one second.
    pub fn tick(&mut self) -> Tick {
        self.advance_to(self.elapsed_secs.saturating_add(1))
    }

    /// Move the clock to `elapsed_secs` since start. Earlier values are
    /// ignored; skipped seconds apply at once.
    pub fn advance_to(&mut self, elapsed_secs: u64) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        self.elapsed_secs = self.elapsed_secs.max(elapsed_secs);

        let remaining = self.remaining_secs();
        if remaining == 0 {
            self.running = false;
            self.urgency = Urgency::Expired;
            return Tick::Expired;
        }

        let next = self.urgency.max(Urgency::for_remaining(remaining));
        let escalated = next != self.urgency;
        self.urgency = next;
        Tick::Running {
            remaining,
            urgency: next,
            escalated,
        }
    }

    /// Stop counting. Later updates report `Stopped` and never expire.
    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(1), "0:01");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(605), "10:05");
    }

    #[test]
    fn test_display_matches_remaining_for_every_second() {
        let limit = 7 * 60;
        for t in 0..=limit {
            let mut countdown = Countdown::from_secs(limit);
            countdown.advance_to(t);
            let remaining = limit - t;
            assert_eq!(
                countdown.display(),
                format!("{}:{:02}", remaining / 60, remaining % 60),
                "elapsed {t}"
            );
        }
    }

    #[test]
    fn test_urgency_is_pure_function_of_remaining() {
        assert_eq!(Urgency::for_remaining(301), Urgency::Normal);
        assert_eq!(Urgency::for_remaining(300), Urgency::Warning);
        assert_eq!(Urgency::for_remaining(61), Urgency::Warning);
        assert_eq!(Urgency::for_remaining(60), Urgency::Danger);
        assert_eq!(Urgency::for_remaining(1), Urgency::Danger);
    }

    #[test]
    fn test_urgency_never_reverses() {
        let mut countdown = Countdown::from_minutes(6);
        let mut last = countdown.urgency();
        let mut escalations = 0;
        loop {
            match countdown.tick() {
                Tick::Running { urgency, escalated, .. } => {
                    assert!(urgency >= last);
                    if escalated {
                        escalations += 1;
                    }
                    last = urgency;
                }
                Tick::Expired => break,
                Tick::Stopped => panic!("stopped before expiring"),
            }
        }
        assert_eq!(escalations, 2);
        assert_eq!(countdown.urgency(), Urgency::Expired);
    }

    #[test]
    fn test_one_minute_scenario() {
        let mut countdown = Countdown::from_minutes(1);
        assert_eq!(countdown.display(), "1:00");

        let tick = countdown.advance_to(59);
        assert_eq!(countdown.display(), "0:01");
        assert_eq!(
            tick,
            Tick::Running { remaining: 1, urgency: Urgency::Danger, escalated: false }
        );

        assert_eq!(countdown.advance_to(60), Tick::Expired);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut countdown = Countdown::from_secs(2);
        assert!(matches!(countdown.tick(), Tick::Running { .. }));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Stopped);
        assert_eq!(countdown.advance_to(100), Tick::Stopped);
    }

    #[test]
    fn test_skipped_seconds_and_backwards_time() {
        let mut countdown = Countdown::from_minutes(10);
        countdown.advance_to(400);
        assert_eq!(countdown.remaining_secs(), 200);
        assert_eq!(countdown.urgency(), Urgency::Warning);

        countdown.advance_to(10);
        assert_eq!(countdown.remaining_secs(), 200);
    }

    #[test]
    fn test_zero_limit_expires_on_first_tick() {
        let mut countdown = Countdown::from_minutes(0);
        assert_eq!(countdown.tick(), Tick::Expired);
    }

    #[test]
    fn test_stop_prevents_expiry() {
        let mut countdown = Countdown::from_secs(3);
        countdown.stop();
        assert_eq!(countdown.advance_to(3), Tick::Stopped);
        assert_eq!(countdown.current(), Tick::Stopped);
    }
}
