//! Terminal User Interface module
//!
//! Screens for taking a quiz, browsing creators and the landing page.

mod app;
mod input;
mod landing_app;
mod notify;
mod search_app;
mod shimmer;
mod theme;
mod view;
mod widgets;

pub use app::{QuizApp, Tui};
pub use input::{InputAction, InputState};
pub use landing_app::LandingApp;
pub use notify::{Toast, Toasts, TOAST_TTL};
pub use search_app::SearchApp;
pub use theme::Theme;
pub use view::TerminalView;
