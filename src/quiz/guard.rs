//! Submit control state and the navigation guard

/// Visual state of the submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitButton {
    Idle,
    Submitting,
}

impl SubmitButton {
    pub fn label(self) -> &'static str {
        match self {
            SubmitButton::Idle => "Submit Quiz",
            SubmitButton::Submitting => "Submitting...",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == SubmitButton::Idle
    }
}

/// Prompt shown when submitting with unanswered questions
pub fn unanswered_prompt(unanswered: usize) -> String {
    format!(
        "You have {unanswered} unanswered question(s). Are you sure you want to submit?"
    )
}

pub const TIME_UP_NOTICE: &str = "Time is up! The quiz will be submitted automatically.";

pub const LEAVE_PROMPT: &str = "Leave this quiz? Your answers have not been submitted.";

/// Warns against leaving the quiz page by accident.
///
/// Armed when the quiz starts, disarmed as soon as submission begins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveGuard {
    armed: bool,
}

impl LeaveGuard {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Whether leaving now needs confirmation
    pub fn should_warn(&self) -> bool {
        self.armed
    }
}
