//! Quizpilot - terminal client for the quiz web application
//!
//! Drives the presentation side of a quiz site from the terminal:
//! - Quiz taking with a countdown, progress tracking and a submit guard
//! - Search-as-you-type over quiz creators
//! - Auto-save of in-progress form data to local storage
//! - The animated landing screen

pub mod autosave;
pub mod config;
pub mod http;
pub mod landing;
pub mod page;
pub mod quiz;
pub mod search;
pub mod tui;

pub use autosave::{AutoSave, FileStore, FormState, LocalStore, MemoryStore};
pub use config::QuizpilotConfig;
pub use http::ServerClient;
pub use page::{LandingPage, QuizPage};
pub use quiz::{Countdown, QuizController, Urgency};
pub use search::{CreatorSearch, Navigation, SearchController};

/// Result type for Quizpilot operations
pub type Result<T> = std::result::Result<T, QuizpilotError>;

/// Errors that can occur in Quizpilot
#[derive(Debug, thiserror::Error)]
pub enum QuizpilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Page document error: {0}")]
    Page(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(u64),

    #[error("Unknown choice {choice:?} for question {question}")]
    UnknownChoice { question: u64, choice: String },

    #[error("Answer to question {question} is longer than {max_length} characters")]
    AnswerTooLong { question: u64, max_length: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
