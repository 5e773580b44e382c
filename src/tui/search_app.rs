//! Creator search screen

use crossterm::event::{Event, KeyCode};
use ratatui::layout::Rect;
use reqwest::Url;
use tracing::debug;

use super::app::{Tui, POLL_TIMEOUT};
use super::input::{InputAction, InputState};
use super::widgets::{frame_layout, HeaderBar, HelpBar, SearchBox, SearchDropdown};
use crate::search::{CreatorSearch, SearchController};
use crate::Result;

const SEARCH_BINDINGS: &[(&str, &str)] = &[
    ("↑↓", "Pick"),
    ("Enter", "Open listing"),
    ("Esc", "Quit"),
];

pub struct SearchApp<C: CreatorSearch> {
    tui: Tui,
    controller: SearchController<C>,
    input: InputState,
    highlighted: Option<usize>,
    listing_path: String,
    base: Url,
    spinner_frame: usize,
    destination: Option<Url>,
    should_quit: bool,
}

impl<C: CreatorSearch> SearchApp<C> {
    pub fn new(controller: SearchController<C>, base: Url, listing_path: String) -> Result<Self> {
        Ok(Self {
            tui: Tui::enter()?,
            controller,
            input: InputState::new(),
            highlighted: None,
            listing_path,
            base,
            spinner_frame: 0,
            destination: None,
            should_quit: false,
        })
    }

    /// Run until the user leaves. Returns the listing URL when enter was
    /// pressed in the field.
    pub async fn run(&mut self) -> Result<Option<Url>> {
        while !self.should_quit {
            if self.controller.pump() {
                self.highlighted = None;
            }
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            self.draw()?;

            if let Some(Event::Key(key)) = Tui::next_event(POLL_TIMEOUT)? {
                self.handle_key(key)?;
            }
        }
        Ok(self.destination.take())
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Result<()> {
        let items = self.controller.panel().items.len();
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c')
                if key
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
                self.should_quit = true
            }
            KeyCode::Down if items > 0 => {
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1).min(items - 1)));
            }
            KeyCode::Up if items > 0 => {
                self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
            }
            KeyCode::Enter => match self.highlighted.take() {
                Some(index) => {
                    if let Some(name) = self.controller.select(index) {
                        self.input.set_buffer(name);
                    }
                }
                None => {
                    let navigation = self.controller.on_enter(&self.listing_path);
                    let url = navigation.resolve(&self.base)?;
                    debug!("Navigating to {}", url);
                    self.destination = Some(url);
                    self.should_quit = true;
                }
            },
            _ => {
                if self.input.handle_key(key) == InputAction::Changed {
                    self.highlighted = None;
                    self.controller.on_input(&self.input.buffer);
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let input = &self.input;
        let panel = self.controller.panel();
        let busy = self.controller.is_busy();
        let highlighted = self.highlighted;
        let spinner_frame = self.spinner_frame;

        self.tui.terminal.draw(|f| {
            let (header, body, footer) = frame_layout(f.area(), 1, 1);
            f.render_widget(
                HeaderBar {
                    title: "Browse quizzes",
                    timer: None,
                },
                header,
            );

            let field = Rect {
                height: 3.min(body.height),
                ..body
            };
            f.render_widget(
                SearchBox {
                    input,
                    busy,
                    spinner_frame,
                },
                field,
            );
            f.set_cursor_position((field.x + 1 + input.cursor_display_width() as u16, field.y + 1));

            let dropdown = Rect {
                y: field.y + field.height,
                height: body.height.saturating_sub(field.height),
                ..body
            };
            f.render_widget(SearchDropdown { panel, highlighted }, dropdown);
            f.render_widget(
                HelpBar {
                    bindings: SEARCH_BINDINGS,
                },
                footer,
            );
        })?;
        Ok(())
    }
}
