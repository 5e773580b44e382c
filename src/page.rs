//! Page documents
//!
//! The web application renders quiz and landing pages on the server and the
//! browser scripts read their behaviour off data attributes in the markup.
//! Here the same contract arrives as JSON: one document per page, carrying
//! exactly the attributes the controllers depend on.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{QuizpilotError, Result};

pub type QuestionId = u64;

/// Question kinds, using the backend's two-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mc")]
    MultipleChoice,
    #[serde(rename = "tf")]
    TrueFalse,
    #[serde(rename = "sa")]
    ShortAnswer,
}

impl QuestionKind {
    /// Whether answers are picked from a fixed set of choices
    pub fn has_choices(self) -> bool {
        !matches!(self, QuestionKind::ShortAnswer)
    }
}

/// How questions are laid out on the quiz page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizLayout {
    /// One question visible at a time with previous/next navigation
    #[default]
    Paged,
    /// Every question on one scrolling page
    Scroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Submitted value (choice id for multiple choice, text for true/false)
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCard {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub choices: Vec<ChoiceOption>,
    /// `maxlength` of the short-answer textarea
    #[serde(default)]
    pub max_length: Option<usize>,
}

fn default_points() -> u32 {
    1
}

impl QuestionCard {
    /// Name of the form field carrying this question's answer
    pub fn field_name(&self) -> String {
        format!("question_{}", self.id)
    }

    pub fn choice(&self, value: &str) -> Option<&ChoiceOption> {
        self.choices.iter().find(|c| c.value == value)
    }
}

/// The quiz-taking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPage {
    pub quiz_id: u64,
    pub title: String,
    #[serde(default = "default_form_id")]
    pub form_id: String,
    /// Path the quiz form posts to
    pub action: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Timer element's time-limit attribute; absent means no countdown
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default = "default_true")]
    pub show_progress: bool,
    #[serde(default)]
    pub layout: QuizLayout,
    pub questions: Vec<QuestionCard>,
}

fn default_form_id() -> String {
    "quiz-form".to_string()
}

fn default_true() -> bool {
    true
}

impl QuizPage {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| QuizpilotError::Page(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let page: QuizPage = serde_json::from_str(text)
            .map_err(|e| QuizpilotError::Page(format!("malformed quiz page: {e}")))?;
        page.validate()?;
        Ok(page)
    }

    pub fn question(&self, id: QuestionId) -> Option<&QuestionCard> {
        self.questions.iter().find(|q| q.id == id)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id) {
                return Err(QuizpilotError::Page(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
            if question.kind.has_choices() && question.choices.is_empty() {
                return Err(QuizpilotError::Page(format!(
                    "question {} has no choices",
                    question.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTile {
    pub label: String,
    /// The statistic's count attribute
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCard {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoCard {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

/// The marketing landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPage {
    pub headline: String,
    #[serde(default = "default_typing_texts")]
    pub typing_texts: Vec<String>,
    #[serde(default)]
    pub stats: Vec<StatTile>,
    #[serde(default)]
    pub features: Vec<FeatureCard>,
    #[serde(default)]
    pub demo: Option<DemoCard>,
}

fn default_typing_texts() -> Vec<String> {
    [
        "Create Amazing Quizzes",
        "Challenge Your Knowledge",
        "Compete with Friends",
        "Track Your Progress",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for LandingPage {
    fn default() -> Self {
        Self {
            headline: "Quiz Master".to_string(),
            typing_texts: default_typing_texts(),
            stats: vec![
                StatTile { label: "Quizzes".to_string(), count: 1200 },
                StatTile { label: "Players".to_string(), count: 15000 },
                StatTile { label: "Questions".to_string(), count: 48000 },
            ],
            features: vec![
                FeatureCard {
                    title: "Create".to_string(),
                    body: "Build quizzes with multiple choice, true/false and short answers.".to_string(),
                },
                FeatureCard {
                    title: "Compete".to_string(),
                    body: "Climb the leaderboard and keep your study streak alive.".to_string(),
                },
                FeatureCard {
                    title: "Track".to_string(),
                    body: "Review every submission and watch your average grow.".to_string(),
                },
            ],
            demo: Some(DemoCard {
                question: "What is the capital of France?".to_string(),
                options: vec![
                    "London".to_string(),
                    "Paris".to_string(),
                    "Berlin".to_string(),
                    "Madrid".to_string(),
                ],
                correct: 1,
            }),
        }
    }
}

impl LandingPage {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| QuizpilotError::Page(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| QuizpilotError::Page(format!("malformed landing page: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "quiz_id": 7,
        "title": "Capitals",
        "action": "/quiz/7/take/",
        "time_limit_minutes": 10,
        "questions": [
            {"id": 1, "text": "Capital of France?", "kind": "mc",
             "choices": [{"value": "11", "label": "Paris"}, {"value": "12", "label": "Rome"}]},
            {"id": 2, "text": "Rome is in Italy", "kind": "tf",
             "choices": [{"value": "True", "label": "True"}, {"value": "False", "label": "False"}]},
            {"id": 3, "text": "Name a river", "kind": "sa", "max_length": 200}
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let page = QuizPage::from_json(PAGE).unwrap();
        assert_eq!(page.form_id, "quiz-form");
        assert_eq!(page.layout, QuizLayout::Paged);
        assert!(page.show_progress);
        assert_eq!(page.questions.len(), 3);
        assert_eq!(page.questions[2].kind, QuestionKind::ShortAnswer);
        assert_eq!(page.questions[0].points, 1);
        assert_eq!(page.questions[0].field_name(), "question_1");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"{"quiz_id": 1, "title": "t", "action": "/a/", "questions": [
            {"id": 1, "text": "a", "kind": "sa"}, {"id": 1, "text": "b", "kind": "sa"}]}"#;
        assert!(matches!(QuizPage::from_json(text), Err(QuizpilotError::Page(_))));
    }

    #[test]
    fn test_choice_question_without_choices_rejected() {
        let text = r#"{"quiz_id": 1, "title": "t", "action": "/a/", "questions": [
            {"id": 1, "text": "a", "kind": "mc"}]}"#;
        assert!(QuizPage::from_json(text).is_err());
    }

    #[test]
    fn test_landing_defaults_typing_texts() {
        let page: LandingPage = serde_json::from_str(r#"{"headline": "Hi"}"#).unwrap();
        assert_eq!(page.typing_texts.len(), 4);
        assert_eq!(page.typing_texts[0], "Create Amazing Quizzes");
        assert!(page.demo.is_none());
    }
}
