//! Terminal rendition of the quiz page state

use std::collections::HashMap;

use super::notify::Toasts;
use crate::page::QuestionId;
use crate::quiz::{
    IndicatorDot, Notice, PagerControls, Progress, QuizView, SubmitButton, Urgency,
};

/// Last state pushed by the controller, read back when drawing.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub timer: Option<(String, Urgency)>,
    pub progress: Option<Progress>,
    pub selections: HashMap<QuestionId, String>,
    pub page: Option<(usize, PagerControls, Vec<IndicatorDot>)>,
    pub button: Option<SubmitButton>,
    pub confirmation: Option<String>,
    pub toasts: Toasts,
}

impl QuizView for TerminalView {
    fn show_timer(&mut self, text: &str, urgency: Urgency) {
        self.timer = Some((text.to_string(), urgency));
    }

    fn show_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    fn show_selection(&mut self, question: QuestionId, value: &str) {
        self.selections.insert(question, value.to_string());
    }

    fn show_page(&mut self, index: usize, controls: PagerControls, dots: &[IndicatorDot]) {
        self.page = Some((index, controls, dots.to_vec()));
    }

    fn show_submit_button(&mut self, state: SubmitButton) {
        self.button = Some(state);
    }

    fn ask_confirmation(&mut self, prompt: &str) {
        self.confirmation = Some(prompt.to_string());
    }

    fn dismiss_confirmation(&mut self) {
        self.confirmation = None;
    }

    fn notify(&mut self, notice: Notice) {
        self.toasts.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::QuizPage;
    use crate::quiz::{QuizController, SubmitOutcome};

    #[test]
    fn test_view_tracks_controller() {
        let page = QuizPage::from_json(
            r#"{"quiz_id": 1, "title": "t", "action": "/quiz/1/take/", "layout": "scroll",
                "time_limit_minutes": 2,
                "questions": [{"id": 5, "text": "q", "kind": "tf",
                  "choices": [{"value": "True", "label": "True"}, {"value": "False", "label": "False"}]}]}"#,
        )
        .unwrap();
        let mut controller = QuizController::new(page, TerminalView::default());
        controller.start();
        assert_eq!(
            controller.view().timer,
            Some(("2:00".to_string(), Urgency::Warning))
        );

        controller.request_submit();
        assert!(controller.view().confirmation.is_some());
        assert_eq!(controller.resolve_confirmation(false), SubmitOutcome::Cancelled);
        assert!(controller.view().confirmation.is_none());
        assert_eq!(controller.view().button, Some(SubmitButton::Idle));

        controller.select_choice(5, "False").unwrap();
        assert_eq!(controller.view().selections.get(&5).map(String::as_str), Some("False"));
        assert_eq!(controller.view().progress.map(|p| p.answered), Some(1));
    }
}
