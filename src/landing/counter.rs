use std::time::Duration;

/// How long a counter takes to reach its target
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2000);

/// One animation frame, about 60 FPS
pub const FRAME: Duration = Duration::from_millis(16);

/// A statistic counting up from zero once it comes into view.
#[derive(Debug, Clone)]
pub struct StatCounter {
    target: u64,
    current: f64,
    step: f64,
    started: bool,
    done: bool,
}

impl StatCounter {
    pub fn new(target: u64) -> Self {
        let frames = COUNT_UP_DURATION.as_millis() as f64 / FRAME.as_millis() as f64;
        Self {
            target,
            current: 0.0,
            step: target as f64 / frames,
            started: false,
            done: false,
        }
    }

    /// Start counting. Later calls do nothing.
    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance one frame.
    pub fn frame(&mut self) {
        if !self.started || self.done {
            return;
        }
        self.current += self.step;
        if self.current >= self.target as f64 {
            self.current = self.target as f64;
            self.done = true;
        }
    }

    pub fn value(&self) -> u64 {
        if self.done {
            self.target
        } else {
            self.current.floor() as u64
        }
    }

    pub fn text(&self) -> String {
        group_thousands(self.value())
    }
}

/// `48000` -> `48,000`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
