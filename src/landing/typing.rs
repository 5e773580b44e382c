use std::time::Duration;

const TYPE_DELAY: Duration = Duration::from_millis(100);
const DELETE_DELAY: Duration = Duration::from_millis(50);
const HOLD_DELAY: Duration = Duration::from_millis(2000);

/// Types each line out, holds it, deletes it and moves on to the next.
#[derive(Debug, Clone)]
pub struct TypingLoop {
    texts: Vec<String>,
    text_index: usize,
    chars: usize,
    deleting: bool,
    pending: Duration,
}

impl TypingLoop {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts,
            text_index: 0,
            chars: 0,
            deleting: false,
            pending: Duration::ZERO,
        }
    }

    fn current_len(&self) -> usize {
        self.texts
            .get(self.text_index)
            .map_or(0, |t| t.chars().count())
    }

    fn next_delay(&self) -> Duration {
        if self.deleting {
            DELETE_DELAY
        } else if self.chars == self.current_len() {
            HOLD_DELAY
        } else {
            TYPE_DELAY
        }
    }

    /// Feed elapsed time into the loop.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.texts.is_empty() {
            return;
        }
        self.pending += elapsed;
        while self.pending >= self.next_delay() {
            self.pending -= self.next_delay();
            self.step();
        }
    }

    fn step(&mut self) {
        let len = self.current_len();
        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
            if self.chars == 0 {
                self.deleting = false;
                self.text_index = (self.text_index + 1) % self.texts.len();
            }
        } else if self.chars == len {
            // Hold is over.
            self.deleting = true;
        } else {
            self.chars += 1;
        }
    }

    /// The part of the current line on screen
    pub fn visible(&self) -> String {
        self.texts
            .get(self.text_index)
            .map(|t| t.chars().take(self.chars).collect())
            .unwrap_or_default()
    }
}
