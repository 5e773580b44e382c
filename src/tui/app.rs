//! Terminal setup and the quiz-taking screen

use std::collections::HashMap;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    Frame, Terminal,
};
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::input::{InputAction, InputState};
use super::theme::Theme;
use super::view::TerminalView;
use super::widgets::{
    frame_layout, wrap_text, ConfirmDialog, HeaderBar, HelpBar, NavBar, PageDots, ProgressLine,
    QuestionView, ToastStack,
};
use crate::autosave::{AutoSave, FileStore};
use crate::config::QuizpilotConfig;
use crate::http::{ServerClient, SubmitReceipt};
use crate::page::{QuestionId, QuestionKind, QuizLayout, QuizPage};
use crate::quiz::{
    CharCounter, Notice, NoticeLevel, QuizController, SubmitOutcome, Submission, LEAVE_PROMPT,
};
use crate::Result;

/// Frame budget of the event loop, about 60 FPS
pub const POLL_TIMEOUT: Duration = Duration::from_millis(16);

const QUIZ_BINDINGS: &[(&str, &str)] = &[
    ("↑↓", "Choose"),
    ("Enter", "Select"),
    ("Tab", "Next"),
    ("Alt+1-9", "Jump"),
    ("Ctrl+S", "Submit"),
    ("Esc", "Leave"),
];

/// Raw mode plus the alternate screen, restored on drop.
pub struct Tui {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Drop keys typed while the screen was switching.
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read()?;
        }
        Ok(Self { terminal })
    }

    /// Next key press within `timeout`, along with any resize.
    pub fn next_event(timeout: Duration) -> io::Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Press => Ok(None),
            other => Ok(Some(other)),
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Quiz-taking screen
pub struct QuizApp {
    tui: Tui,
    controller: QuizController<TerminalView>,
    client: ServerClient,
    autosave: AutoSave<FileStore>,
    answers: HashMap<QuestionId, InputState>,
    focus: usize,
    choice_cursor: usize,
    started: Instant,
    submit_rx: Option<oneshot::Receiver<Result<SubmitReceipt>>>,
    leave_prompt: bool,
    finished: Option<String>,
    should_quit: bool,
}

impl QuizApp {
    pub fn new(config: &QuizpilotConfig, page: QuizPage) -> Result<Self> {
        let store = FileStore::open(config.autosave_dir())?;
        let autosave = AutoSave::new(page.form_id.clone(), store);
        let answers = page
            .questions
            .iter()
            .filter(|q| q.kind == QuestionKind::ShortAnswer)
            .map(|q| (q.id, InputState::with_limit(q.max_length)))
            .collect();
        let controller = QuizController::new(page, TerminalView::default());
        let tui = Tui::enter()?;

        Ok(Self {
            tui,
            controller,
            client: ServerClient::new(config),
            autosave,
            answers,
            focus: 0,
            choice_cursor: 0,
            started: Instant::now(),
            submit_rx: None,
            leave_prompt: false,
            finished: None,
            should_quit: false,
        })
    }

    /// Run until the user leaves. Returns the results URL when the quiz was
    /// submitted.
    pub async fn run(&mut self) -> Result<Option<String>> {
        self.started = Instant::now();
        self.controller.start();
        self.restore_answers()?;

        while !self.should_quit {
            if let Some(submission) = self.controller.sync_clock(self.started.elapsed()) {
                self.spawn_submit(submission);
            }
            self.check_submission();
            self.controller.view_mut().toasts.expire(Instant::now());

            self.draw()?;

            if let Some(Event::Key(key)) = Tui::next_event(POLL_TIMEOUT)? {
                self.handle_key(key);
            }
        }

        self.controller.stop();
        Ok(self.finished.take())
    }

    fn restore_answers(&mut self) -> Result<()> {
        let mut form = self.controller.form_state();
        if self.autosave.restore(&mut form)? == 0 {
            return Ok(());
        }
        let applied = self.controller.apply_form(&form)?;
        for (id, input) in &mut self.answers {
            if let Some(text) = self.controller.sheet().text(*id) {
                input.set_buffer(text);
            }
        }
        if applied > 0 {
            info!("Restored {} saved answer(s)", applied);
            self.controller.view_mut().toasts.push(Notice::new(
                NoticeLevel::Info,
                format!("Restored {applied} saved answer(s)"),
            ));
        }
        Ok(())
    }

    fn save_progress(&mut self) {
        let form = self.controller.form_state();
        if let Err(e) = self.autosave.record(&form) {
            warn!("Auto-save failed: {}", e);
        }
    }

    fn spawn_submit(&mut self, submission: Submission) {
        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        tokio::spawn(async move {
            let _ = tx.send(client.submit(&submission).await);
        });
        self.submit_rx = Some(rx);
    }

    fn check_submission(&mut self) {
        let Some(rx) = &mut self.submit_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.submit_rx = None;
                return;
            }
        };
        self.submit_rx = None;

        let notice = match result {
            Ok(receipt) => {
                if let Err(e) = self.autosave.clear() {
                    warn!("Could not clear auto-save record: {}", e);
                }
                self.finished = Some(receipt.url.to_string());
                Notice::new(NoticeLevel::Success, "Quiz submitted!")
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                Notice::new(NoticeLevel::Danger, format!("Submission failed: {e}"))
            }
        };
        self.controller.view_mut().toasts.push(notice);
    }

    fn apply_outcome(&mut self, outcome: SubmitOutcome) {
        if let SubmitOutcome::Submit(submission) = outcome {
            self.spawn_submit(submission);
        }
    }

    fn focused_index(&self) -> usize {
        self.controller.current_page().unwrap_or(self.focus)
    }

    fn move_focus(&mut self, forward: bool) {
        let moved = if self.controller.current_page().is_some() {
            if forward {
                self.controller.next_page()
            } else {
                self.controller.prev_page()
            }
        } else {
            let total = self.controller.page().questions.len();
            let next = if forward {
                (self.focus + 1).min(total.saturating_sub(1))
            } else {
                self.focus.saturating_sub(1)
            };
            let moved = next != self.focus;
            self.focus = next;
            moved
        };
        if moved {
            self.reset_choice_cursor();
        }
    }

    /// Same as clicking an indicator dot in paged layout.
    fn jump_to(&mut self, index: usize) {
        let moved = if self.controller.current_page().is_some() {
            self.controller.go_to_page(index)
        } else if index < self.controller.page().questions.len() && index != self.focus {
            self.focus = index;
            true
        } else {
            false
        };
        if moved {
            self.reset_choice_cursor();
        }
    }

    fn reset_choice_cursor(&mut self) {
        let index = self.focused_index();
        let Some(card) = self.controller.page().questions.get(index) else {
            return;
        };
        let selected = self.controller.sheet().selected(card.id);
        self.choice_cursor = card
            .choices
            .iter()
            .position(|c| Some(c.value.as_str()) == selected)
            .unwrap_or(0);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.should_quit = true;
            return;
        }

        if self.leave_prompt {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.should_quit = true,
                KeyCode::Char('n') | KeyCode::Esc => self.leave_prompt = false,
                _ => {}
            }
            return;
        }

        if self.controller.is_confirming() {
            let outcome = match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.controller.resolve_confirmation(true),
                KeyCode::Char('n') | KeyCode::Esc => self.controller.resolve_confirmation(false),
                _ => return,
            };
            self.apply_outcome(outcome);
            return;
        }

        if self.controller.is_submitted() {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.controller.should_warn_on_leave() {
                    self.leave_prompt = true;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let outcome = self.controller.request_submit();
                self.apply_outcome(outcome);
            }
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => {
                if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.jump_to(index);
                }
            }
            KeyCode::Tab | KeyCode::PageDown => self.move_focus(true),
            KeyCode::BackTab | KeyCode::PageUp => self.move_focus(false),
            _ => self.handle_answer_key(key),
        }
    }

    fn handle_answer_key(&mut self, key: KeyEvent) {
        let index = self.focused_index();
        let Some(card) = self.controller.page().questions.get(index) else {
            return;
        };
        let id = card.id;
        let choice_values: Vec<String> = card.choices.iter().map(|c| c.value.clone()).collect();

        if let Some(input) = self.answers.get_mut(&id) {
            if input.handle_key(key) == InputAction::Changed {
                let text = input.buffer.clone();
                if let Err(e) = self.controller.enter_text(id, &text) {
                    warn!("Rejected answer for question {}: {}", id, e);
                }
                self.save_progress();
            }
            return;
        }

        let pick = match key.code {
            KeyCode::Up => {
                self.choice_cursor = self.choice_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.choice_cursor =
                    (self.choice_cursor + 1).min(choice_values.len().saturating_sub(1));
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(self.choice_cursor),
            KeyCode::Char(c) => c
                .to_digit(10)
                .and_then(|d| (d as usize).checked_sub(1))
                .filter(|i| *i < choice_values.len()),
            _ => None,
        };

        if let Some(choice) = pick.and_then(|i| choice_values.get(i)) {
            self.choice_cursor = pick.unwrap_or(0);
            if let Err(e) = self.controller.select_choice(id, choice) {
                warn!("Rejected choice for question {}: {}", id, e);
            }
            self.save_progress();
        }
    }

    fn draw(&mut self) -> Result<()> {
        let controller = &self.controller;
        let answers = &self.answers;
        let focus = self.focused_index();
        let choice_cursor = self.choice_cursor;
        let leave_prompt = self.leave_prompt;
        let finished = self.finished.as_deref();

        self.tui.terminal.draw(|f| {
            render_quiz(f, controller, answers, focus, choice_cursor, finished);

            let view = controller.view();
            if let Some(prompt) = &view.confirmation {
                f.render_widget(
                    ConfirmDialog {
                        title: "Submit quiz",
                        prompt,
                    },
                    f.area(),
                );
            } else if leave_prompt {
                f.render_widget(
                    ConfirmDialog {
                        title: "Leave quiz",
                        prompt: LEAVE_PROMPT,
                    },
                    f.area(),
                );
            }
            f.render_widget(
                ToastStack {
                    toasts: view.toasts.visible(),
                },
                f.area(),
            );
        })?;
        Ok(())
    }
}

fn question_height(page: &QuizPage, index: usize, width: u16) -> u16 {
    let Some(card) = page.questions.get(index) else {
        return 0;
    };
    let text = wrap_text(&card.text, width.saturating_sub(2) as usize).len();
    let answer = if card.kind.has_choices() { 0 } else { 2 };
    (text + 1 + card.choices.len() + answer + 2) as u16
}

fn render_quiz(
    f: &mut Frame,
    controller: &QuizController<TerminalView>,
    answers: &HashMap<QuestionId, InputState>,
    focus: usize,
    choice_cursor: usize,
    finished: Option<&str>,
) {
    let view = controller.view();
    let page = controller.page();
    let (header, body, footer) = frame_layout(f.area(), 2, 3);

    f.render_widget(
        HeaderBar {
            title: &page.title,
            timer: view.timer.as_ref().map(|(text, urgency)| (text.as_str(), *urgency)),
        },
        Rect { height: 1, ..header },
    );
    if let Some(progress) = view.progress {
        f.render_widget(
            ProgressLine { progress },
            Rect {
                y: header.y + 1,
                height: 1,
                ..header
            },
        );
    }

    let visible: Vec<usize> = match page.layout {
        QuizLayout::Paged => vec![focus],
        QuizLayout::Scroll => (focus..page.questions.len()).collect(),
    };
    let mut y = body.y;
    for index in visible {
        let height = question_height(page, index, body.width);
        if y + height > body.y + body.height && index != focus {
            break;
        }
        let area = Rect {
            x: body.x,
            y,
            width: body.width,
            height: height.min(body.y + body.height - y),
        };
        let card = &page.questions[index];
        let answer = answers.get(&card.id);
        f.render_widget(
            QuestionView {
                card,
                number: index + 1,
                total: page.questions.len(),
                selected: controller.sheet().selected(card.id),
                cursor: (index == focus && card.kind.has_choices()).then_some(choice_cursor),
                answer,
                counter: card
                    .max_length
                    .zip(answer)
                    .map(|(max, input)| CharCounter::new(max).status(&input.buffer)),
                focused: index == focus,
            },
            area,
        );
        if index == focus {
            if let Some(input) = answer {
                let text_rows = wrap_text(&card.text, body.width.saturating_sub(2) as usize).len();
                f.set_cursor_position((
                    area.x + 3 + input.cursor_display_width() as u16,
                    area.y + 1 + text_rows as u16 + 1,
                ));
            }
        }
        y += height;
    }

    if let Some((_, _, dots)) = &view.page {
        f.render_widget(PageDots { dots }, Rect { height: 1, ..footer });
    }
    let status_row = Rect {
        y: footer.y + 1,
        height: 1,
        ..footer
    };
    match finished {
        Some(url) => {
            let line = Line::from(vec![
                Span::styled(" ✓ Submitted. Results at ", Theme::success()),
                Span::styled(url, Theme::accent()),
                Span::styled("  (q to quit)", Theme::muted()),
            ]);
            f.buffer_mut().set_line(status_row.x, status_row.y, &line, status_row.width);
        }
        None => f.render_widget(
            NavBar {
                controls: view.page.as_ref().map(|(_, controls, _)| *controls),
                button: controller.submit_button(),
            },
            status_row,
        ),
    }
    f.render_widget(
        HelpBar {
            bindings: QUIZ_BINDINGS,
        },
        Rect {
            y: footer.y + 2,
            height: 1,
            ..footer
        },
    );
}
