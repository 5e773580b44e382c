//! View binding for the quiz page
//!
//! The controller never reaches into the screen. It talks to a
//! [`QuizView`], and [`QuizBindings`] decides once per page which optional
//! elements exist, so a missing timer or progress bar turns its feature off
//! up front instead of failing on every update.

use tracing::debug;

use super::countdown::Urgency;
use super::guard::SubmitButton;
use super::pager::{IndicatorDot, PagerControls};
use super::progress::Progress;
use crate::page::{QuestionId, QuizLayout, QuizPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Rendering surface driven by the quiz controller.
pub trait QuizView {
    fn show_timer(&mut self, text: &str, urgency: Urgency);

    fn show_progress(&mut self, progress: Progress);

    /// `value` became the only selected choice of `question`
    fn show_selection(&mut self, question: QuestionId, value: &str);

    fn show_page(&mut self, index: usize, controls: PagerControls, dots: &[IndicatorDot]);

    fn show_submit_button(&mut self, state: SubmitButton);

    fn ask_confirmation(&mut self, prompt: &str);

    fn dismiss_confirmation(&mut self);

    fn notify(&mut self, notice: Notice);
}

/// The form element every quiz page carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    pub id: String,
    pub action: String,
    pub csrf_token: Option<String>,
}

/// Elements resolved once from the page document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBindings {
    pub form: FormBinding,
    /// Time limit in minutes, when the page has a timer
    pub timer_minutes: Option<u32>,
    pub progress: bool,
    /// Number of pages, when questions are shown one at a time
    pub pages: Option<usize>,
}

impl QuizBindings {
    pub fn resolve(page: &QuizPage) -> Self {
        let timer_minutes = page.time_limit_minutes;
        if timer_minutes.is_none() {
            debug!("Quiz {} has no time limit; countdown disabled", page.quiz_id);
        }
        if !page.show_progress {
            debug!("Quiz {} hides progress; progress bar disabled", page.quiz_id);
        }
        let pages = match page.layout {
            QuizLayout::Paged if !page.questions.is_empty() => Some(page.questions.len()),
            QuizLayout::Paged => {
                debug!("Quiz {} has no questions; navigation disabled", page.quiz_id);
                None
            }
            QuizLayout::Scroll => None,
        };

        Self {
            form: FormBinding {
                id: page.form_id.clone(),
                action: page.action.clone(),
                csrf_token: page.csrf_token.clone(),
            },
            timer_minutes,
            progress: page.show_progress,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(layout: &str, extra: &str) -> QuizPage {
        QuizPage::from_json(&format!(
            r#"{{"quiz_id": 3, "title": "t", "action": "/quiz/3/take/", "layout": "{layout}" {extra},
                "questions": [{{"id": 1, "text": "q", "kind": "sa"}}]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_resolve_paged_with_timer() {
        let bindings = QuizBindings::resolve(&page("paged", r#", "time_limit_minutes": 5"#));
        assert_eq!(bindings.timer_minutes, Some(5));
        assert_eq!(bindings.pages, Some(1));
        assert!(bindings.progress);
        assert_eq!(bindings.form.action, "/quiz/3/take/");
    }

    #[test]
    fn test_resolve_scroll_without_optional_elements() {
        let bindings = QuizBindings::resolve(&page("scroll", r#", "show_progress": false"#));
        assert_eq!(bindings.timer_minutes, None);
        assert_eq!(bindings.pages, None);
        assert!(!bindings.progress);
    }
}
