//! Color theme for the TUI - using ANSI colors for better terminal compatibility

use ratatui::style::{Color, Modifier, Style};

use crate::quiz::{CounterTone, NoticeLevel, Urgency};

/// Theme using ANSI colors that work well across terminal themes
pub struct Theme;

impl Theme {
    pub const CYAN: Color = Color::Cyan;
    pub const GREEN: Color = Color::Green;
    pub const YELLOW: Color = Color::Yellow;
    pub const RED: Color = Color::Red;
    pub const BLUE: Color = Color::Blue;
    pub const MAGENTA: Color = Color::Magenta;
    pub const DARK_GRAY: Color = Color::DarkGray;
    pub const GRAY: Color = Color::Gray;

    // Semantic styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::MAGENTA)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default()
    }

    pub fn dim() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    pub fn bold() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::BLUE)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::CYAN)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::CYAN)
    }

    // Timer badge per urgency tier
    pub fn timer(urgency: Urgency) -> Style {
        let base = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        match urgency {
            Urgency::Normal => base.bg(Self::BLUE),
            Urgency::Warning => base.bg(Self::YELLOW),
            Urgency::Danger => base.bg(Self::RED),
            Urgency::Expired => base.bg(Self::RED).add_modifier(Modifier::SLOW_BLINK),
        }
    }

    pub fn notice(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Self::info(),
            NoticeLevel::Success => Self::success(),
            NoticeLevel::Warning => Self::warning(),
            NoticeLevel::Danger => Self::error(),
        }
    }

    pub fn counter(tone: CounterTone) -> Style {
        match tone {
            CounterTone::Muted => Self::muted(),
            CounterTone::Warning => Self::warning(),
            CounterTone::Danger => Self::error(),
        }
    }

    // Choice states
    pub fn choice_selected() -> Style {
        Style::default()
            .fg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn choice_correct() -> Style {
        Style::default()
            .bg(Self::GREEN)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dot_current() -> Style {
        Style::default().fg(Self::CYAN)
    }

    pub fn dot_answered() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn progress_fill() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn button() -> Style {
        Style::default()
            .bg(Self::GREEN)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_busy() -> Style {
        Style::default()
            .fg(Self::DARK_GRAY)
            .add_modifier(Modifier::ITALIC)
    }

    // Key hints
    pub fn key() -> Style {
        Style::default()
            .fg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }
}
