//! Remaining-characters counter for length-limited text answers

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTone {
    Muted,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterStatus {
    pub remaining: usize,
    pub tone: CounterTone,
}

impl CounterStatus {
    pub fn label(&self) -> String {
        format!("{} characters remaining", self.remaining)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CharCounter {
    max_length: usize,
}

impl CharCounter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Whether `text` fits inside the limit
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() <= self.max_length
    }

    pub fn status(&self, text: &str) -> CounterStatus {
        let remaining = self.max_length.saturating_sub(text.chars().count());
        let tone = if remaining < 10 {
            CounterTone::Danger
        } else if remaining < 50 {
            CounterTone::Warning
        } else {
            CounterTone::Muted
        };
        CounterStatus { remaining, tone }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tones() {
        let counter = CharCounter::new(100);
        assert_eq!(counter.status("").tone, CounterTone::Muted);
        assert_eq!(counter.status(&"x".repeat(51)).tone, CounterTone::Warning);
        assert_eq!(counter.status(&"x".repeat(91)).tone, CounterTone::Danger);
        assert_eq!(counter.status(&"x".repeat(91)).label(), "9 characters remaining");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let counter = CharCounter::new(2);
        assert!(counter.accepts("\u{4f60}\u{597d}"));
        assert!(!counter.accepts("abc"));
        assert_eq!(counter.status("\u{4f60}").remaining, 1);
    }
}
