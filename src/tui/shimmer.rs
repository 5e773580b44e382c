//! Animated text effects
//!
//! A sweeping highlight for busy labels, a braille spinner and a block
//! progress bar.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn elapsed_since_start() -> Duration {
    let start = PROCESS_START.get_or_init(Instant::now);
    start.elapsed()
}

/// Spans of `text` with a highlight band sweeping across every two seconds.
pub fn shimmer_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let padding = 10usize;
    let period = chars.len() + padding * 2;
    let sweep_seconds = 2.0f32;
    let pos = (elapsed_since_start().as_secs_f32() % sweep_seconds) / sweep_seconds
        * (period as f32);
    let band_half_width = 5.0;

    chars
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let dist = ((i + padding) as f32 - pos).abs();
            let intensity = if dist <= band_half_width {
                let x = std::f32::consts::PI * (dist / band_half_width);
                0.5 * (1.0 + x.cos())
            } else {
                0.0
            };
            Span::styled(ch.to_string(), style_for_intensity(base, intensity))
        })
        .collect()
}

fn style_for_intensity(base: Style, intensity: f32) -> Style {
    if intensity < 0.2 {
        base.add_modifier(Modifier::DIM)
    } else if intensity < 0.6 {
        base
    } else {
        base.add_modifier(Modifier::BOLD)
    }
}

/// Braille spinner
pub struct AnimatedDots {
    frame: usize,
}

impl AnimatedDots {
    const FRAMES: &'static [&'static str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    pub fn current(&self) -> &'static str {
        Self::FRAMES[self.frame % Self::FRAMES.len()]
    }
}

/// Block progress bar
pub struct ProgressBar;

impl ProgressBar {
    const FULL: char = '█';
    const EMPTY: char = '░';
    const PARTIAL: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    /// `ratio` in `0.0..=1.0` rendered over `width` cells
    pub fn render(ratio: f32, width: usize) -> String {
        let ratio = ratio.clamp(0.0, 1.0);
        let exact = ratio * width as f32;
        let filled = exact as usize;
        let partial_idx = ((exact - filled as f32) * 8.0) as usize;

        (0..width)
            .map(|i| {
                if i < filled {
                    Self::FULL
                } else if i == filled && partial_idx > 0 {
                    Self::PARTIAL[partial_idx.min(7)]
                } else {
                    Self::EMPTY
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(ProgressBar::render(0.0, 4), "░░░░");
        assert_eq!(ProgressBar::render(1.0, 4), "████");
        assert_eq!(ProgressBar::render(0.5, 4), "██░░");
        assert_eq!(ProgressBar::render(3.0, 2).chars().count(), 2);
    }

    #[test]
    fn test_shimmer_keeps_text() {
        let text: String = shimmer_spans("Submitting...", Style::default())
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "Submitting...");
    }
}
