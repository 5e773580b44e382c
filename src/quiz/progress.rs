//! Answer tracking and completion progress

use std::collections::{BTreeMap, BTreeSet};

use crate::page::{QuestionId, QuizPage};
use crate::{QuizpilotError, Result};

/// Completion snapshot for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Bar width in percent. An empty quiz reports 0.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }

    /// Fraction in `0.0..=1.0`
    pub fn ratio(&self) -> f32 {
        (self.percent() / 100.0) as f32
    }

    /// Text shown beside the bar, e.g. `3 / 5`
    pub fn label(&self) -> String {
        format!("{} / {}", self.answered, self.total)
    }
}

/// Outcome of recording an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    /// The question was not answered before this action
    pub newly_answered: bool,
}

/// Per-question answers for one quiz page.
///
/// Each choice question holds at most one selected value. A question,
/// once answered, stays answered.
#[derive(Debug, Clone)]
pub struct AnswerSheet {
    order: Vec<QuestionId>,
    choices: BTreeMap<QuestionId, BTreeSet<String>>,
    selected: BTreeMap<QuestionId, String>,
    text: BTreeMap<QuestionId, String>,
    answered: BTreeSet<QuestionId>,
}

impl AnswerSheet {
    pub fn new(page: &QuizPage) -> Self {
        let order = page.questions.iter().map(|q| q.id).collect();
        let choices = page
            .questions
            .iter()
            .filter(|q| q.kind.has_choices())
            .map(|q| (q.id, q.choices.iter().map(|c| c.value.clone()).collect()))
            .collect();
        Self {
            order,
            choices,
            selected: BTreeMap::new(),
            text: BTreeMap::new(),
            answered: BTreeSet::new(),
        }
    }

    /// Select `value` for a choice question, replacing any earlier pick.
    pub fn select(&mut self, question: QuestionId, value: &str) -> Result<Recorded> {
        let allowed = self
            .choices
            .get(&question)
            .ok_or(QuizpilotError::UnknownQuestion(question))?;
        if !allowed.contains(value) {
            return Err(QuizpilotError::UnknownChoice {
                question,
                choice: value.to_string(),
            });
        }
        self.selected.insert(question, value.to_string());
        Ok(self.mark_answered(question))
    }

    /// Store free text for a short-answer question. Non-empty text marks
    /// the question answered.
    pub fn set_text(&mut self, question: QuestionId, value: &str) -> Result<Recorded> {
        if !self.order.contains(&question) || self.choices.contains_key(&question) {
            return Err(QuizpilotError::UnknownQuestion(question));
        }
        self.text.insert(question, value.to_string());
        if value.trim().is_empty() {
            return Ok(Recorded { newly_answered: false });
        }
        Ok(self.mark_answered(question))
    }

    fn mark_answered(&mut self, question: QuestionId) -> Recorded {
        Recorded {
            newly_answered: self.answered.insert(question),
        }
    }

    pub fn selected(&self, question: QuestionId) -> Option<&str> {
        self.selected.get(&question).map(String::as_str)
    }

    pub fn text(&self, question: QuestionId) -> Option<&str> {
        self.text.get(&question).map(String::as_str)
    }

    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.answered.contains(&question)
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.order.len() - self.answered.len()
    }

    /// Whether the question at page position `index` is answered
    pub fn is_answered_at(&self, index: usize) -> bool {
        self.order
            .get(index)
            .is_some_and(|id| self.answered.contains(id))
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answered.len(),
            total: self.order.len(),
        }
    }

    /// Answer fields in page order, named `question_<id>`. Unanswered
    /// choice questions are left out, as an unchecked radio group would be.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|id| {
                let value = self.selected.get(id).or_else(|| self.text.get(id))?;
                Some((format!("question_{id}"), value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ChoiceOption, QuestionCard, QuestionKind, QuizLayout};

    fn page(questions: usize) -> QuizPage {
        QuizPage {
            quiz_id: 1,
            title: "Test".to_string(),
            form_id: "quiz-form".to_string(),
            action: "/quiz/1/take/".to_string(),
            csrf_token: None,
            time_limit_minutes: None,
            show_progress: true,
            layout: QuizLayout::Scroll,
            questions: (1..=questions as u64)
                .map(|id| QuestionCard {
                    id,
                    text: format!("Q{id}"),
                    kind: QuestionKind::MultipleChoice,
                    points: 1,
                    choices: vec![
                        ChoiceOption { value: "a".to_string(), label: "A".to_string() },
                        ChoiceOption { value: "b".to_string(), label: "B".to_string() },
                    ],
                    max_length: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_three_of_five_is_sixty_percent() {
        let mut sheet = AnswerSheet::new(&page(5));
        for id in 1..=3 {
            sheet.select(id, "a").unwrap();
        }
        let progress = sheet.progress();
        assert_eq!(progress.percent(), 60.0);
        assert_eq!(progress.label(), "3 / 5");
        assert_eq!(sheet.unanswered_count(), 2);
    }

    #[test]
    fn test_reselecting_does_not_double_count() {
        let mut sheet = AnswerSheet::new(&page(2));
        assert!(sheet.select(1, "a").unwrap().newly_answered);
        assert!(!sheet.select(1, "a").unwrap().newly_answered);
        assert!(!sheet.select(1, "b").unwrap().newly_answered);
        assert_eq!(sheet.answered_count(), 1);
        assert_eq!(sheet.selected(1), Some("b"));
    }

    #[test]
    fn test_unknown_question_and_choice() {
        let mut sheet = AnswerSheet::new(&page(1));
        assert!(matches!(sheet.select(9, "a"), Err(QuizpilotError::UnknownQuestion(9))));
        assert!(matches!(
            sheet.select(1, "z"),
            Err(QuizpilotError::UnknownChoice { question: 1, .. })
        ));
        assert_eq!(sheet.answered_count(), 0);
    }

    #[test]
    fn test_empty_quiz_progress() {
        let sheet = AnswerSheet::new(&page(0));
        assert_eq!(sheet.progress().percent(), 0.0);
        assert_eq!(sheet.progress().label(), "0 / 0");
    }

    #[test]
    fn test_short_answer_marks_on_non_empty_text() {
        let mut quiz = page(1);
        quiz.questions.push(QuestionCard {
            id: 2,
            text: "Explain".to_string(),
            kind: QuestionKind::ShortAnswer,
            points: 1,
            choices: Vec::new(),
            max_length: Some(100),
        });
        let mut sheet = AnswerSheet::new(&quiz);

        assert!(!sheet.set_text(2, "   ").unwrap().newly_answered);
        assert!(!sheet.is_answered(2));
        assert!(sheet.set_text(2, "Because").unwrap().newly_answered);
        sheet.set_text(2, "").unwrap();
        assert!(sheet.is_answered(2));
        assert!(sheet.set_text(1, "text").is_err());
    }

    #[test]
    fn test_form_fields_in_page_order() {
        let mut sheet = AnswerSheet::new(&page(3));
        sheet.select(3, "b").unwrap();
        sheet.select(1, "a").unwrap();
        assert_eq!(
            sheet.form_fields(),
            vec![
                ("question_1".to_string(), "a".to_string()),
                ("question_3".to_string(), "b".to_string()),
            ]
        );
    }
}
