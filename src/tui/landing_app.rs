//! Animated landing screen

use std::time::Instant;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use super::app::{Tui, POLL_TIMEOUT};
use super::theme::Theme;
use super::widgets::HelpBar;
use crate::landing::{
    LandingScene, OptionState, DEMO_SECTION, FEATURES_SECTION, HERO_SECTION, STATS_SECTION,
};
use crate::page::LandingPage;
use crate::Result;

const LANDING_BINDINGS: &[(&str, &str)] = &[
    ("↑↓", "Scroll"),
    ("1-4", "Answer demo"),
    ("q", "Quit"),
];

const HERO_ROWS: u16 = 12;
const STATS_ROWS: u16 = 5;
const FEATURE_ROWS: u16 = 6;
const DEMO_ROWS: u16 = 9;

/// Terminal cells mapped to particle space, roughly one pixel grid per cell
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;

pub struct LandingApp {
    tui: Tui,
    scene: LandingScene,
    last_frame: Instant,
    should_quit: bool,
}

impl LandingApp {
    pub fn new(page: LandingPage) -> Result<Self> {
        let tui = Tui::enter()?;
        let size = tui.terminal.size()?;
        let scene = LandingScene::new(
            page,
            f64::from(size.width) * CELL_WIDTH,
            f64::from(HERO_ROWS) * CELL_HEIGHT,
        );
        Ok(Self {
            tui,
            scene,
            last_frame: Instant::now(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.scene.advance(now - self.last_frame);
            self.last_frame = now;

            self.draw()?;

            match Tui::next_event(POLL_TIMEOUT)? {
                Some(Event::Key(key)) => self.handle_key(key.code),
                Some(Event::Resize(width, _)) => self.scene.particles.resize(
                    f64::from(width) * CELL_WIDTH,
                    f64::from(HERO_ROWS) * CELL_HEIGHT,
                ),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.scene.scroll_by(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.scene.scroll_by(-1.0),
            KeyCode::PageDown => self.scene.scroll_by(10.0),
            KeyCode::PageUp => self.scene.scroll_by(-10.0),
            KeyCode::Char(c) => {
                if let (Some(demo), Some(d)) = (&mut self.scene.demo, c.to_digit(10)) {
                    if d >= 1 {
                        demo.pick(d as usize - 1);
                    }
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> Result<()> {
        let scene = &mut self.scene;
        self.tui.terminal.draw(|f| render_landing(f, scene))?;
        Ok(())
    }
}

/// Where a section sits in the scrolled document
fn section_rect(view: Rect, top: i32, rows: u16) -> Option<Rect> {
    let bottom = top + i32::from(rows);
    let view_bottom = i32::from(view.height);
    if bottom <= 0 || top >= view_bottom {
        return None;
    }
    let y = top.max(0);
    let height = bottom.min(view_bottom) - y;
    Some(Rect {
        x: view.x,
        y: view.y + y as u16,
        width: view.width,
        height: height as u16,
    })
}

fn render_landing(f: &mut Frame, scene: &mut LandingScene) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let (view, footer) = (chunks[0], chunks[1]);

    let scroll = scene.scroll() as i32;
    let hero_top = scene.hero_offset() as i32;
    let stats_top = i32::from(HERO_ROWS) - scroll;
    let features_top = stats_top + i32::from(STATS_ROWS);
    let demo_top = features_top + i32::from(FEATURE_ROWS);

    if let Some(area) = section_rect(view, hero_top, HERO_ROWS) {
        scene.section_visible(HERO_SECTION);
        render_hero(f, area, scene);
    }
    if let Some(area) = section_rect(view, stats_top, STATS_ROWS) {
        scene.section_visible(STATS_SECTION);
        render_stats(f, area, scene);
    }
    if let Some(area) = section_rect(view, features_top, FEATURE_ROWS) {
        scene.section_visible(FEATURES_SECTION);
        render_features(f, area, scene);
    }
    if let Some(area) = section_rect(view, demo_top, DEMO_ROWS) {
        scene.section_visible(DEMO_SECTION);
        render_demo(f, area, scene);
    }

    f.render_widget(
        HelpBar {
            bindings: LANDING_BINDINGS,
        },
        footer,
    );
}

fn render_hero(f: &mut Frame, area: Rect, scene: &LandingScene) {
    let field = &scene.particles;
    let points: Vec<(f64, f64)> = field
        .particles()
        .iter()
        .map(|p| (p.x, field.height() - p.y))
        .collect();
    let links = field.links();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, field.width()])
        .y_bounds([0.0, field.height()])
        .paint(|ctx| {
            for link in &links {
                let color = if link.strength > 0.5 {
                    Color::Gray
                } else {
                    Color::DarkGray
                };
                ctx.draw(&CanvasLine {
                    x1: link.from.0,
                    y1: field.height() - link.from.1,
                    x2: link.to.0,
                    y2: field.height() - link.to.1,
                    color,
                });
            }
            ctx.draw(&Points {
                coords: &points,
                color: Color::White,
            });
        });
    f.render_widget(canvas, area);

    let typed = scene.typing.visible();
    let text = vec![
        Line::from(Span::styled(scene.page.headline.as_str(), Theme::title())),
        Line::from(vec![
            Span::styled(typed, Theme::subtitle()),
            Span::styled("▌", Theme::accent()),
        ]),
    ];
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 2.min(area.height - area.height / 2),
        ..area
    };
    f.render_widget(
        Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
        middle,
    );
}

fn render_stats(f: &mut Frame, area: Rect, scene: &LandingScene) {
    if scene.counters.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, scene.counters.len() as u32); scene.counters.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    for ((counter, stat), cell) in scene.counters.iter().zip(&scene.page.stats).zip(cells.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let lines = vec![
            Line::from(Span::styled(counter.text(), Theme::title())),
            Line::from(Span::styled(stat.label.as_str(), Theme::muted())),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .alignment(ratatui::layout::Alignment::Center)
                .block(block),
            *cell,
        );
    }
}

fn render_features(f: &mut Frame, area: Rect, scene: &LandingScene) {
    let features = &scene.page.features;
    if features.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, features.len() as u32); features.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    for (feature, cell) in features.iter().zip(cells.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(format!(" {} ", feature.title), Theme::subtitle()));
        f.render_widget(
            Paragraph::new(feature.body.as_str())
                .wrap(Wrap { trim: true })
                .block(block),
            *cell,
        );
    }
}

fn render_demo(f: &mut Frame, area: Rect, scene: &LandingScene) {
    let Some(demo) = &scene.demo else {
        return;
    };
    let card = demo.card();
    let mut lines = vec![
        Line::from(Span::styled(card.question.as_str(), Theme::bold())),
        Line::from(""),
    ];
    for (i, option) in card.options.iter().enumerate() {
        let style = match demo.option_state(i) {
            OptionState::Plain => Theme::text(),
            OptionState::Selected => Theme::choice_selected(),
            OptionState::Correct => Theme::choice_correct(),
            OptionState::Dimmed => Theme::dim(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", i + 1), Theme::key()),
            Span::styled(option.as_str(), style),
        ]));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::MAGENTA))
        .title(Span::styled(" Try it ", Theme::subtitle()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
