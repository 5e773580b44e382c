//! Quiz-taking controller
//!
//! One instance per quiz page. It owns the countdown, the answer sheet, the
//! pager and the submit guard, and pushes every visible change through a
//! [`QuizView`]. Submission itself is handed back to the caller as a
//! [`Submission`] so the transport stays outside.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::char_counter::CharCounter;
use super::countdown::{format_clock, Countdown, Tick, Urgency};
use super::guard::{unanswered_prompt, LeaveGuard, SubmitButton, TIME_UP_NOTICE};
use super::pager::Pager;
use super::progress::AnswerSheet;
use super::view::{Notice, NoticeLevel, QuizBindings, QuizView};
use crate::autosave::{FieldKind, FormField, FormState};
use crate::page::{QuestionId, QuestionKind, QuizPage};
use crate::{QuizpilotError, Result};

/// Why the form is being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    TimeUp,
}

/// A form ready to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub action: String,
    pub fields: Vec<(String, String)>,
    pub reason: SubmitReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Post this form now. Produced at most once per page.
    Submit(Submission),
    /// Waiting on the user to confirm submitting with gaps
    NeedsConfirmation { unanswered: usize },
    /// The user backed out of the confirmation
    Cancelled,
    /// Nothing to do in the current phase
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Confirming,
    Submitted,
    Stopped,
}

pub struct QuizController<V: QuizView> {
    page: QuizPage,
    bindings: QuizBindings,
    view: V,
    countdown: Option<Countdown>,
    sheet: AnswerSheet,
    pager: Option<Pager>,
    phase: Phase,
    leave_guard: LeaveGuard,
    button: SubmitButton,
}

impl<V: QuizView> QuizController<V> {
    pub fn new(page: QuizPage, view: V) -> Self {
        let bindings = QuizBindings::resolve(&page);
        let countdown = bindings.timer_minutes.map(Countdown::from_minutes);
        let pager = bindings.pages.map(Pager::new);
        let sheet = AnswerSheet::new(&page);
        Self {
            page,
            bindings,
            view,
            countdown,
            sheet,
            pager,
            phase: Phase::Ready,
            leave_guard: LeaveGuard::default(),
            button: SubmitButton::Idle,
        }
    }

    /// Arm the navigation guard and render the initial state.
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.phase = Phase::Running;
        self.leave_guard.arm();

        if let Some(countdown) = &self.countdown {
            if let Tick::Running { urgency, .. } = countdown.current() {
                self.view.show_timer(&countdown.display(), urgency);
            }
        }
        self.render_progress();
        self.render_page();
        self.view.show_submit_button(self.button);
        info!(
            "Started quiz {} ({} questions)",
            self.page.quiz_id,
            self.page.questions.len()
        );
    }

    /// Stop the clock and release the navigation guard.
    pub fn stop(&mut self) {
        if let Some(countdown) = &mut self.countdown {
            countdown.stop();
        }
        self.leave_guard.disarm();
        if self.phase != Phase::Submitted {
            self.phase = Phase::Stopped;
        }
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> Option<Submission> {
        let tick = self.countdown.as_mut()?.tick();
        self.apply_tick(tick)
    }

    /// Bring the clock in line with wall-clock time since start.
    pub fn sync_clock(&mut self, elapsed: Duration) -> Option<Submission> {
        let tick = self.countdown.as_mut()?.advance_to(elapsed.as_secs());
        self.apply_tick(tick)
    }

    fn apply_tick(&mut self, tick: Tick) -> Option<Submission> {
        if !matches!(self.phase, Phase::Running | Phase::Confirming) {
            return None;
        }
        match tick {
            Tick::Running { remaining, urgency, escalated } => {
                if escalated {
                    debug!("Timer urgency now {}", urgency.label());
                }
                self.view
                    .show_timer(&format_clock(remaining), urgency);
                None
            }
            Tick::Expired => {
                info!("Time limit reached for quiz {}", self.page.quiz_id);
                self.view.show_timer("0:00", Urgency::Expired);
                if self.phase == Phase::Confirming {
                    self.view.dismiss_confirmation();
                }
                self.view.notify(Notice::new(NoticeLevel::Warning, TIME_UP_NOTICE));
                Some(self.begin_submission(SubmitReason::TimeUp))
            }
            Tick::Stopped => None,
        }
    }

    /// Pick `value` as the answer to a choice question.
    pub fn select_choice(&mut self, question: QuestionId, value: &str) -> Result<()> {
        if !self.accepts_answers() {
            return Ok(());
        }
        let recorded = self.sheet.select(question, value)?;
        self.view.show_selection(question, value);
        if recorded.newly_answered {
            self.on_answered();
        }
        Ok(())
    }

    /// Replace the text of a short-answer question. Text longer than the
    /// question's `max_length` is refused.
    pub fn enter_text(&mut self, question: QuestionId, text: &str) -> Result<()> {
        if !self.accepts_answers() {
            return Ok(());
        }
        let max_length = self.page.question(question).and_then(|q| q.max_length);
        if let Some(max_length) = max_length {
            if !CharCounter::new(max_length).accepts(text) {
                return Err(QuizpilotError::AnswerTooLong {
                    question,
                    max_length,
                });
            }
        }
        let recorded = self.sheet.set_text(question, text)?;
        if recorded.newly_answered {
            self.on_answered();
        }
        Ok(())
    }

    fn accepts_answers(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Running | Phase::Confirming)
    }

    fn on_answered(&mut self) {
        self.render_progress();
        // Dots show the answered set.
        self.render_page();
    }

    pub fn next_page(&mut self) -> bool {
        self.navigate(Pager::next)
    }

    pub fn prev_page(&mut self) -> bool {
        self.navigate(Pager::prev)
    }

    pub fn go_to_page(&mut self, index: usize) -> bool {
        self.navigate(|pager| pager.go_to(index))
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Pager) -> bool) -> bool {
        let Some(pager) = &mut self.pager else {
            return false;
        };
        let moved = step(pager);
        if moved {
            self.render_page();
        }
        moved
    }

    /// The user pressed submit.
    pub fn request_submit(&mut self) -> SubmitOutcome {
        if self.phase != Phase::Running {
            return SubmitOutcome::Ignored;
        }
        if let Some(pager) = &self.pager {
            if !pager.controls().submit_visible {
                return SubmitOutcome::Ignored;
            }
        }

        self.set_button(SubmitButton::Submitting);
        let unanswered = self.sheet.unanswered_count();
        if unanswered > 0 {
            self.phase = Phase::Confirming;
            self.view.ask_confirmation(&unanswered_prompt(unanswered));
            return SubmitOutcome::NeedsConfirmation { unanswered };
        }
        SubmitOutcome::Submit(self.begin_submission(SubmitReason::Manual))
    }

    /// Answer the unanswered-questions prompt.
    pub fn resolve_confirmation(&mut self, proceed: bool) -> SubmitOutcome {
        if self.phase != Phase::Confirming {
            return SubmitOutcome::Ignored;
        }
        self.view.dismiss_confirmation();
        if proceed {
            return SubmitOutcome::Submit(self.begin_submission(SubmitReason::Manual));
        }
        self.phase = Phase::Running;
        self.set_button(SubmitButton::Idle);
        SubmitOutcome::Cancelled
    }

    fn begin_submission(&mut self, reason: SubmitReason) -> Submission {
        self.phase = Phase::Submitted;
        self.leave_guard.disarm();
        if let Some(countdown) = &mut self.countdown {
            countdown.stop();
        }
        self.set_button(SubmitButton::Submitting);

        let mut fields = Vec::new();
        if let Some(token) = &self.bindings.form.csrf_token {
            fields.push(("csrfmiddlewaretoken".to_string(), token.clone()));
        }
        fields.extend(self.sheet.form_fields());
        info!(
            "Submitting quiz {} ({:?}, {} answer field(s))",
            self.page.quiz_id,
            reason,
            fields.len()
        );
        Submission {
            action: self.bindings.form.action.clone(),
            fields,
            reason,
        }
    }

    fn set_button(&mut self, state: SubmitButton) {
        self.button = state;
        self.view.show_submit_button(state);
    }

    fn render_progress(&mut self) {
        if self.bindings.progress {
            self.view.show_progress(self.sheet.progress());
        }
    }

    fn render_page(&mut self) {
        if let Some(pager) = &self.pager {
            let sheet = &self.sheet;
            let dots = pager.dots(|index| sheet.is_answered_at(index));
            self.view.show_page(pager.current(), pager.controls(), &dots);
        }
    }

    /// Whether leaving now needs a confirmation
    pub fn should_warn_on_leave(&self) -> bool {
        self.leave_guard.should_warn()
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn is_confirming(&self) -> bool {
        self.phase == Phase::Confirming
    }

    /// Form values in the shape auto-save stores.
    pub fn form_state(&self) -> FormState {
        let mut form = FormState::new(self.bindings.form.id.clone());
        for question in &self.page.questions {
            let name = question.field_name();
            if question.kind == QuestionKind::ShortAnswer {
                let text = self.sheet.text(question.id).unwrap_or_default();
                form.fields.push(FormField::new(name, FieldKind::TextArea, text));
                continue;
            }
            let selected = self.sheet.selected(question.id);
            for choice in &question.choices {
                let checked = selected == Some(choice.value.as_str());
                form.fields
                    .push(FormField::radio(name.clone(), choice.value.clone(), checked));
            }
        }
        form
    }

    /// Apply restored text fields back onto the answer sheet. Returns how
    /// many answers were filled in.
    pub fn apply_form(&mut self, form: &FormState) -> Result<usize> {
        let mut applied = 0;
        for field in form.fields.iter().filter(|f| f.kind != FieldKind::Radio) {
            let Some(id) = field
                .name
                .strip_prefix("question_")
                .and_then(|id| id.parse::<QuestionId>().ok())
            else {
                continue;
            };
            let kind = self.page.question(id).map(|q| q.kind);
            match kind {
                Some(QuestionKind::ShortAnswer) if !field.value.is_empty() => {
                    match self.enter_text(id, &field.value) {
                        Ok(()) => applied += 1,
                        Err(e @ QuizpilotError::AnswerTooLong { .. }) => {
                            warn!("Skipping saved answer: {}", e);
                        }
                        Err(e) => return Err(e),
                    }
                }
                Some(_) => {}
                None => return Err(QuizpilotError::UnknownQuestion(id)),
            }
        }
        Ok(applied)
    }

    pub fn page(&self) -> &QuizPage {
        &self.page
    }

    pub fn bindings(&self) -> &QuizBindings {
        &self.bindings
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Index of the visible question, when paged
    pub fn current_page(&self) -> Option<usize> {
        self.pager.as_ref().map(Pager::current)
    }

    pub fn submit_button(&self) -> SubmitButton {
        self.button
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::pager::{IndicatorDot, PagerControls};
    use crate::quiz::progress::Progress;

    #[derive(Default)]
    struct RecordingView {
        timer: Vec<(String, Urgency)>,
        progress: Vec<Progress>,
        pages: Vec<(usize, PagerControls, Vec<IndicatorDot>)>,
        buttons: Vec<SubmitButton>,
        prompts: Vec<String>,
        dismissed: usize,
        notices: Vec<Notice>,
    }

    impl QuizView for RecordingView {
        fn show_timer(&mut self, text: &str, urgency: Urgency) {
            self.timer.push((text.to_string(), urgency));
        }
        fn show_progress(&mut self, progress: Progress) {
            self.progress.push(progress);
        }
        fn show_selection(&mut self, _question: QuestionId, _value: &str) {}
        fn show_page(&mut self, index: usize, controls: PagerControls, dots: &[IndicatorDot]) {
            self.pages.push((index, controls, dots.to_vec()));
        }
        fn show_submit_button(&mut self, state: SubmitButton) {
            self.buttons.push(state);
        }
        fn ask_confirmation(&mut self, prompt: &str) {
            self.prompts.push(prompt.to_string());
        }
        fn dismiss_confirmation(&mut self) {
            self.dismissed += 1;
        }
        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    fn page(layout: &str, minutes: u32) -> QuizPage {
        QuizPage::from_json(&format!(
            r#"{{"quiz_id": 4, "title": "Capitals", "action": "/quiz/4/take/",
                "csrf_token": "tok", "time_limit_minutes": {minutes}, "layout": "{layout}",
                "questions": [
                  {{"id": 10, "text": "France?", "kind": "mc",
                    "choices": [{{"value": "1", "label": "Paris"}}, {{"value": "2", "label": "Lyon"}}]}},
                  {{"id": 11, "text": "Spain?", "kind": "mc",
                    "choices": [{{"value": "3", "label": "Madrid"}}, {{"value": "4", "label": "Bilbao"}}]}},
                  {{"id": 12, "text": "Describe Rome", "kind": "sa", "max_length": 300}}
                ]}}"#
        ))
        .unwrap()
    }

    fn started(layout: &str, minutes: u32) -> QuizController<RecordingView> {
        let mut controller = QuizController::new(page(layout, minutes), RecordingView::default());
        controller.start();
        controller
    }

    #[test]
    fn test_start_renders_initial_state() {
        let controller = started("paged", 10);
        let view = controller.view();
        assert_eq!(view.timer, vec![("10:00".to_string(), Urgency::Normal)]);
        assert_eq!(view.progress.last().unwrap().label(), "0 / 3");
        assert_eq!(view.pages.last().unwrap().0, 0);
        assert_eq!(view.buttons, vec![SubmitButton::Idle]);
        assert!(controller.should_warn_on_leave());
    }

    #[test]
    fn test_selection_updates_progress_once() {
        let mut controller = started("scroll", 10);
        controller.select_choice(10, "1").unwrap();
        controller.select_choice(10, "2").unwrap();
        controller.select_choice(10, "2").unwrap();
        assert_eq!(controller.view().progress.len(), 2);
        assert_eq!(controller.sheet().answered_count(), 1);
    }

    #[test]
    fn test_dots_follow_answers() {
        let mut controller = started("paged", 10);
        controller.select_choice(11, "3").unwrap();
        let (index, _, dots) = controller.view().pages.last().unwrap().clone();
        assert_eq!(index, 0);
        assert!(dots[0].current && !dots[0].answered);
        assert!(!dots[1].current && dots[1].answered);
    }

    #[test]
    fn test_submit_only_on_last_page() {
        let mut controller = started("paged", 10);
        assert_eq!(controller.request_submit(), SubmitOutcome::Ignored);
        assert!(controller.next_page());
        assert!(controller.next_page());
        assert!(!controller.next_page());
        assert_eq!(
            controller.request_submit(),
            SubmitOutcome::NeedsConfirmation { unanswered: 3 }
        );
    }

    #[test]
    fn test_cancel_confirmation_restores_idle_button() {
        let mut controller = started("scroll", 10);
        controller.select_choice(10, "1").unwrap();

        assert_eq!(
            controller.request_submit(),
            SubmitOutcome::NeedsConfirmation { unanswered: 2 }
        );
        assert_eq!(
            controller.view().prompts,
            vec!["You have 2 unanswered question(s). Are you sure you want to submit?".to_string()]
        );
        assert_eq!(controller.submit_button(), SubmitButton::Submitting);

        assert_eq!(controller.resolve_confirmation(false), SubmitOutcome::Cancelled);
        assert_eq!(controller.submit_button(), SubmitButton::Idle);
        assert!(!controller.is_submitted());
        assert!(controller.should_warn_on_leave());
    }

    #[test]
    fn test_proceed_submits_once() {
        let mut controller = started("scroll", 10);
        controller.select_choice(10, "1").unwrap();
        controller.request_submit();

        let SubmitOutcome::Submit(submission) = controller.resolve_confirmation(true) else {
            panic!("expected submission");
        };
        assert_eq!(submission.action, "/quiz/4/take/");
        assert_eq!(submission.reason, SubmitReason::Manual);
        assert_eq!(
            submission.fields,
            vec![
                ("csrfmiddlewaretoken".to_string(), "tok".to_string()),
                ("question_10".to_string(), "1".to_string()),
            ]
        );
        assert!(!controller.should_warn_on_leave());
        assert_eq!(controller.request_submit(), SubmitOutcome::Ignored);
        assert_eq!(controller.resolve_confirmation(true), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_fully_answered_submits_without_prompt() {
        let mut controller = started("scroll", 10);
        controller.select_choice(10, "1").unwrap();
        controller.select_choice(11, "4").unwrap();
        controller.enter_text(12, "Seven hills").unwrap();
        assert!(matches!(controller.request_submit(), SubmitOutcome::Submit(_)));
        assert!(controller.view().prompts.is_empty());
    }

    #[test]
    fn test_time_up_auto_submits_exactly_once() {
        let mut controller = started("scroll", 1);
        for _ in 0..59 {
            assert!(controller.tick().is_none());
        }
        assert_eq!(
            controller.view().timer.last().unwrap(),
            &("0:01".to_string(), Urgency::Danger)
        );

        let submission = controller.tick().expect("auto-submit at zero");
        assert_eq!(submission.reason, SubmitReason::TimeUp);
        assert_eq!(controller.view().notices[0].message, TIME_UP_NOTICE);
        assert!(controller.tick().is_none());
        assert!(controller.sync_clock(Duration::from_secs(600)).is_none());
        assert!(controller.is_submitted());
    }

    #[test]
    fn test_expiry_during_confirmation_bypasses_prompt() {
        let mut controller = started("scroll", 1);
        controller.request_submit();
        assert!(controller.is_confirming());

        let submission = controller.sync_clock(Duration::from_secs(60));
        assert!(submission.is_some());
        assert_eq!(controller.view().dismissed, 1);
        assert_eq!(controller.resolve_confirmation(false), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_answers_ignored_after_submission() {
        let mut controller = started("scroll", 1);
        controller.sync_clock(Duration::from_secs(60));
        controller.select_choice(10, "1").unwrap();
        assert_eq!(controller.sheet().answered_count(), 0);
    }

    #[test]
    fn test_form_state_and_apply_round_trip() {
        let mut controller = started("scroll", 10);
        controller.select_choice(10, "2").unwrap();
        controller.enter_text(12, "Seven hills").unwrap();

        let form = controller.form_state();
        let snapshot = form.snapshot();
        assert_eq!(snapshot.get("question_10").map(String::as_str), Some("2"));
        assert_eq!(snapshot.get("question_12").map(String::as_str), Some("Seven hills"));
        assert!(!snapshot.contains_key("question_11"));

        let mut fresh = started("scroll", 10);
        assert_eq!(fresh.apply_form(&form).unwrap(), 1);
        assert_eq!(fresh.sheet().text(12), Some("Seven hills"));
        assert_eq!(fresh.sheet().selected(10), None);
    }

    #[test]
    fn test_jump_to_page_renders_dots_and_controls() {
        let mut controller = started("paged", 10);
        assert!(controller.go_to_page(2));

        let (index, controls, dots) = controller.view().pages.last().unwrap().clone();
        assert_eq!(index, 2);
        assert_eq!(controller.current_page(), Some(2));
        assert_eq!(
            controls,
            PagerControls {
                prev_enabled: true,
                next_enabled: false,
                submit_visible: true,
            }
        );
        assert!(dots[2].current && !dots[0].current && !dots[1].current);

        let rendered = controller.view().pages.len();
        assert!(!controller.go_to_page(3));
        assert!(!controller.go_to_page(2));
        assert_eq!(controller.view().pages.len(), rendered);
        assert_eq!(controller.current_page(), Some(2));
    }

    #[test]
    fn test_jump_is_noop_in_scroll_layout() {
        let mut controller = started("scroll", 10);
        assert!(!controller.go_to_page(1));
        assert_eq!(controller.current_page(), None);
    }

    #[test]
    fn test_text_over_max_length_is_refused() {
        let mut controller = started("scroll", 10);
        let err = controller.enter_text(12, &"x".repeat(301)).unwrap_err();
        assert!(matches!(
            err,
            QuizpilotError::AnswerTooLong {
                question: 12,
                max_length: 300
            }
        ));
        assert_eq!(controller.sheet().text(12), None);
        controller.enter_text(12, &"x".repeat(300)).unwrap();
        assert_eq!(controller.sheet().answered_count(), 1);
    }

    #[test]
    fn test_restored_text_over_max_length_is_skipped() {
        let form = FormState::new("quiz-form")
            .with_field(FormField::new("question_12", FieldKind::TextArea, "y".repeat(400)));
        let mut controller = started("scroll", 10);
        assert_eq!(controller.apply_form(&form).unwrap(), 0);
        assert_eq!(controller.sheet().text(12), None);
    }

    #[test]
    fn test_no_timer_when_page_has_no_limit() {
        let mut quiz = page("scroll", 1);
        quiz.time_limit_minutes = None;
        let mut controller = QuizController::new(quiz, RecordingView::default());
        controller.start();
        assert!(controller.view().timer.is_empty());
        assert!(controller.tick().is_none());
    }
}
