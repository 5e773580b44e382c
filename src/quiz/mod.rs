//! Quiz taking
//!
//! The countdown, answer tracking, paged navigation and the submit guard,
//! tied together by [`QuizController`].

mod char_counter;
mod controller;
mod countdown;
mod guard;
mod pager;
mod progress;
mod view;

pub use char_counter::{CharCounter, CounterStatus, CounterTone};
pub use controller::{QuizController, SubmitOutcome, SubmitReason, Submission};
pub use countdown::{
    format_clock, Countdown, Tick, Urgency, DANGER_THRESHOLD_SECS, WARNING_THRESHOLD_SECS,
};
pub use guard::{unanswered_prompt, LeaveGuard, SubmitButton, LEAVE_PROMPT, TIME_UP_NOTICE};
pub use pager::{IndicatorDot, Pager, PagerControls};
pub use progress::{AnswerSheet, Progress, Recorded};
pub use view::{FormBinding, Notice, NoticeLevel, QuizBindings, QuizView};
