//! Single-line text field editing
//!
//! Backs both the creator search box and short-answer fields.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// Result of handling a key in a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Key was not for the field
    Ignored,
    /// Cursor moved, text unchanged
    Moved,
    /// The text changed
    Changed,
    /// Enter pressed
    Enter,
    /// Edit refused by the length limit
    Rejected,
}

/// Text field state
///
/// Note: `cursor` is a CHARACTER index, not a byte index.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buffer: String,
    pub cursor: usize,
    /// Maximum number of characters accepted
    pub max_chars: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_chars: Option<usize>) -> Self {
        Self {
            max_chars,
            ..Self::default()
        }
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.buffer.len())
    }

    fn insert_char(&mut self, c: char) -> bool {
        if self.max_chars.is_some_and(|max| self.char_count() >= max) {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
        true
    }

    fn remove_char_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte_index(self.cursor);
        if let Some(ch) = self.buffer[byte_idx..].chars().next() {
            self.buffer.replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
        }
        true
    }

    fn remove_char_at_cursor(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor);
        if let Some(ch) = self.buffer[byte_idx..].chars().next() {
            self.buffer.replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
        }
        true
    }

    /// Apply a key to the field.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => InputAction::Enter,
            KeyCode::Backspace => changed(self.remove_char_before_cursor()),
            KeyCode::Delete => changed(self.remove_char_at_cursor()),
            KeyCode::Char('u') if ctrl => {
                let had_text = !self.buffer.is_empty();
                self.buffer.clear();
                self.cursor = 0;
                changed(had_text)
            }
            KeyCode::Char('w') if ctrl => changed(self.delete_word()),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputAction::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                InputAction::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputAction::Moved
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                InputAction::Moved
            }
            KeyCode::Char(_) if ctrl => InputAction::Ignored,
            KeyCode::Char(c) => {
                if self.insert_char(c) {
                    InputAction::Changed
                } else {
                    InputAction::Rejected
                }
            }
            _ => InputAction::Ignored,
        }
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_buffer(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.cursor = self.char_count();
    }

    fn delete_word(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && self.char_before_cursor() == Some(' ') {
            self.remove_char_before_cursor();
        }
        while self.cursor > 0 && self.char_before_cursor() != Some(' ') {
            self.remove_char_before_cursor();
        }
        self.cursor != start
    }

    fn char_before_cursor(&self) -> Option<char> {
        self.buffer.chars().nth(self.cursor.checked_sub(1)?)
    }

    /// Cursor position in terminal columns
    pub fn cursor_display_width(&self) -> usize {
        self.buffer
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(1))
            .sum()
    }
}

fn changed(did_change: bool) -> InputAction {
    if did_change {
        InputAction::Changed
    } else {
        InputAction::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str) -> InputState {
        let mut state = InputState::new();
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state
    }

    #[test]
    fn test_insert_unicode() {
        let state = typed("h\u{4f60}\u{597d}");
        assert_eq!(state.buffer, "h\u{4f60}\u{597d}");
        assert_eq!(state.cursor, 3);
        assert_eq!(state.cursor_display_width(), 5);
    }

    #[test]
    fn test_backspace_unicode() {
        let mut state = typed("\u{4f60}\u{597d}");
        assert_eq!(state.handle_key(key(KeyCode::Backspace)), InputAction::Changed);
        assert_eq!(state.buffer, "\u{4f60}");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_backspace_at_start_is_not_a_change() {
        let mut state = InputState::new();
        assert_eq!(state.handle_key(key(KeyCode::Backspace)), InputAction::Moved);
    }

    #[test]
    fn test_length_limit() {
        let mut state = InputState::with_limit(Some(3));
        for c in "abc".chars() {
            assert_eq!(state.handle_key(key(KeyCode::Char(c))), InputAction::Changed);
        }
        assert_eq!(state.handle_key(key(KeyCode::Char('d'))), InputAction::Rejected);
        assert_eq!(state.buffer, "abc");
    }

    #[test]
    fn test_delete_word() {
        let mut state = typed("rivers of europe ");
        let action = state.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(action, InputAction::Changed);
        assert_eq!(state.buffer, "rivers of ");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut state = typed("ac");
        state.handle_key(key(KeyCode::Left));
        state.handle_key(key(KeyCode::Char('b')));
        assert_eq!(state.buffer, "abc");
        assert_eq!(state.cursor, 2);
    }
}
