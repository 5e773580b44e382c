//! Custom widgets for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::input::InputState;
use super::notify::Toast;
use super::shimmer::{shimmer_spans, AnimatedDots, ProgressBar};
use super::theme::Theme;
use crate::page::QuestionCard;
use crate::quiz::{CounterStatus, IndicatorDot, PagerControls, Progress, SubmitButton, Urgency};
use crate::search::ResultsPanel;

/// Wrap a long string into multiple lines, respecting unicode width
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || text.width() <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for c in text.chars() {
        let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + char_width > max_width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }
        current_line.push(c);
        current_width += char_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

/// A `width` x `height` rectangle centred in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Header bar with the quiz title and the timer badge
pub struct HeaderBar<'a> {
    pub title: &'a str,
    pub timer: Option<(&'a str, Urgency)>,
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let title_line = Line::from(vec![
            Span::styled("◆ ", Theme::accent()),
            Span::styled(self.title, Theme::title()),
        ]);
        buf.set_line(area.x + 1, area.y, &title_line, area.width.saturating_sub(2));

        if let Some((text, urgency)) = self.timer {
            let badge = format!(" ⏱ {} ", text);
            let badge_len = badge.width() as u16;
            let badge_x = area.x + area.width.saturating_sub(badge_len + 1);
            let span = Span::styled(badge, Theme::timer(urgency));
            buf.set_span(badge_x, area.y, &span, badge_len);
        }
    }
}

/// Answered count with a bar
pub struct ProgressLine {
    pub progress: Progress,
}

impl Widget for ProgressLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = format!(" {} ({:.0}%)", self.progress.label(), self.progress.percent());
        let bar_width = (area.width as usize)
            .saturating_sub(label.width() + 12)
            .min(40);
        let line = Line::from(vec![
            Span::styled(" Progress ", Theme::muted()),
            Span::styled(
                ProgressBar::render(self.progress.ratio(), bar_width),
                Theme::progress_fill(),
            ),
            Span::styled(label, Theme::text()),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// One question with its choices or answer field
pub struct QuestionView<'a> {
    pub card: &'a QuestionCard,
    pub number: usize,
    pub total: usize,
    pub selected: Option<&'a str>,
    /// Highlighted choice row, when focused
    pub cursor: Option<usize>,
    pub answer: Option<&'a InputState>,
    pub counter: Option<CounterStatus>,
    pub focused: bool,
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let points = if self.card.points == 1 {
            "1 point".to_string()
        } else {
            format!("{} points", self.card.points)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                format!(" Question {} of {} ", self.number, self.total),
                Theme::muted(),
            ))
            .title_bottom(Span::styled(format!(" {points} "), Theme::muted()));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = wrap_text(&self.card.text, inner.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Theme::bold())))
            .collect();
        lines.push(Line::from(""));

        for (i, choice) in self.card.choices.iter().enumerate() {
            let picked = self.selected == Some(choice.value.as_str());
            let marker = if picked { "(●) " } else { "( ) " };
            let pointer = if self.cursor == Some(i) { "› " } else { "  " };
            let style = if picked {
                Theme::choice_selected()
            } else {
                Theme::text()
            };
            lines.push(Line::from(vec![
                Span::styled(pointer, Theme::accent()),
                Span::styled(marker, style),
                Span::styled(choice.label.as_str(), style),
            ]));
        }

        if let Some(answer) = self.answer {
            let (text, style) = if answer.buffer.is_empty() {
                ("Type your answer...", Theme::muted())
            } else {
                (answer.buffer.as_str(), Theme::text())
            };
            lines.push(Line::from(vec![
                Span::styled("› ", Theme::accent()),
                Span::styled(text, style),
            ]));
            if let Some(status) = &self.counter {
                lines.push(Line::from(Span::styled(
                    status.label(),
                    Theme::counter(status.tone),
                )));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Page indicator dots
pub struct PageDots<'a> {
    pub dots: &'a [IndicatorDot],
}

impl Widget for PageDots<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .dots
            .iter()
            .flat_map(|dot| {
                let (glyph, style) = match (dot.current, dot.answered) {
                    (true, _) => ("◉", Theme::dot_current()),
                    (false, true) => ("●", Theme::dot_answered()),
                    (false, false) => ("○", Theme::muted()),
                };
                [Span::styled(glyph, style), Span::raw(" ")]
            })
            .collect();
        let line = Line::from(spans);
        let width = line.width() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        buf.set_line(x, area.y, &line, area.width);
    }
}

/// Previous / next / submit controls
pub struct NavBar {
    pub controls: Option<PagerControls>,
    pub button: SubmitButton,
}

impl Widget for NavBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        if let Some(controls) = self.controls {
            let prev = if controls.prev_enabled {
                Theme::key()
            } else {
                Theme::muted()
            };
            let next = if controls.next_enabled {
                Theme::key()
            } else {
                Theme::muted()
            };
            spans.push(Span::styled("[← Prev]", prev));
            spans.push(Span::raw(" "));
            spans.push(Span::styled("[Next →]", next));
            spans.push(Span::raw("  "));
        }

        let submit_visible = self.controls.map_or(true, |c| c.submit_visible);
        if submit_visible {
            if self.button.is_enabled() {
                spans.push(Span::styled(format!(" {} ", self.button.label()), Theme::button()));
            } else {
                spans.extend(shimmer_spans(self.button.label(), Theme::button_busy()));
            }
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// The creator search field
pub struct SearchBox<'a> {
    pub input: &'a InputState,
    pub busy: bool,
    pub spinner_frame: usize,
}

impl Widget for SearchBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(" Search creators ", Theme::muted()));
        if self.busy {
            let spinner = AnimatedDots::new(self.spinner_frame);
            block = block.title_bottom(Span::styled(
                format!(" {} searching ", spinner.current()),
                Theme::accent(),
            ));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let (text, style) = if self.input.buffer.is_empty() {
            ("Type at least two characters...", Theme::muted())
        } else {
            (self.input.buffer.as_str(), Theme::text())
        };
        Paragraph::new(text).style(style).render(inner, buf);
    }
}

/// Suggestions under the search field
pub struct SearchDropdown<'a> {
    pub panel: &'a ResultsPanel,
    pub highlighted: Option<usize>,
}

impl Widget for SearchDropdown<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.panel.visible {
            return;
        }
        let height = (self.panel.items.len() as u16 + 2).min(area.height);
        let area = Rect { height, ..area };
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        for (i, creator) in self.panel.items.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if self.highlighted == Some(i) {
                Theme::choice_selected()
            } else {
                Theme::text()
            };
            let line = Line::from(vec![
                Span::styled("👤 ", Style::default()),
                Span::styled(creator.username.as_str(), style),
            ]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}

/// Modal yes/no prompt
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub prompt: &'a str,
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 56.min(area.width);
        let body = wrap_text(self.prompt, width.saturating_sub(4) as usize);
        let dialog = centered_rect(width, body.len() as u16 + 4, area);
        Clear.render(dialog, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::warning())
            .title(Span::styled(format!(" {} ", self.title), Theme::warning()));
        let inner = block.inner(dialog);
        block.render(dialog, buf);

        let mut lines: Vec<Line> = body.into_iter().map(Line::from).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("y", Theme::key()),
            Span::styled(" OK   ", Theme::key_desc()),
            Span::styled("n", Theme::key()),
            Span::styled(" Cancel", Theme::key_desc()),
        ]));
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Toasts in the top-right corner, newest at the bottom
pub struct ToastStack<'a> {
    pub toasts: &'a [Toast],
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 44.min(area.width);
        let mut y = area.y + 1;
        for toast in self.toasts {
            let body = wrap_text(&toast.notice.message, width.saturating_sub(2) as usize);
            let height = body.len() as u16 + 2;
            if y + height > area.y + area.height {
                break;
            }
            let rect = Rect {
                x: area.x + area.width - width,
                y,
                width,
                height,
            };
            Clear.render(rect, buf);
            let style = Theme::notice(toast.notice.level);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title_bottom(Span::styled(format!(" {} ", toast.timestamp), Theme::muted()));
            let inner = block.inner(rect);
            block.render(rect, buf);
            let lines: Vec<Line> = body
                .into_iter()
                .map(|l| Line::from(Span::styled(l, style)))
                .collect();
            Paragraph::new(lines).render(inner, buf);
            y += height;
        }
    }
}

/// Help bar showing key bindings
pub struct HelpBar<'a> {
    pub bindings: &'a [(&'a str, &'a str)],
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Theme::muted()));
            }
            spans.push(Span::styled(*key, Theme::key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::key_desc()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Split `area` into header, body and footer rows
pub fn frame_layout(area: Rect, header: u16, footer: u16) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header),
            Constraint::Min(3),
            Constraint::Length(footer),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("\u{4f60}\u{597d}\u{4e16}", 4), vec!["\u{4f60}\u{597d}", "\u{4e16}"]);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect(100, 30, area), area);
    }

    #[test]
    fn test_header_renders_timer_badge() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        HeaderBar {
            title: "Capitals",
            timer: Some(("4:59", Urgency::Warning)),
        }
        .render(area, &mut buf);
        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.contains("Capitals"));
        assert!(row.contains("4:59"));
    }
}
