use std::time::Duration;

use crate::page::DemoCard;

const REVEAL_AFTER: Duration = Duration::from_millis(500);
const RESET_AFTER: Duration = Duration::from_millis(2500);

/// Visual state of a demo option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Plain,
    Selected,
    Correct,
    Dimmed,
}

/// The clickable sample question on the landing page.
#[derive(Debug, Clone)]
pub struct DemoQuiz {
    card: DemoCard,
    selected: Option<usize>,
    since_pick: Duration,
}

impl DemoQuiz {
    pub fn new(card: DemoCard) -> Self {
        Self {
            card,
            selected: None,
            since_pick: Duration::ZERO,
        }
    }

    pub fn card(&self) -> &DemoCard {
        &self.card
    }

    /// Pick an option. Restarts the reveal timing.
    pub fn pick(&mut self, index: usize) {
        if index < self.card.options.len() {
            self.selected = Some(index);
            self.since_pick = Duration::ZERO;
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        if self.selected.is_none() {
            return;
        }
        self.since_pick += elapsed;
        if self.since_pick >= RESET_AFTER {
            self.selected = None;
        }
    }

    pub fn option_state(&self, index: usize) -> OptionState {
        let Some(selected) = self.selected else {
            return OptionState::Plain;
        };
        if self.since_pick >= REVEAL_AFTER {
            if index == self.card.correct {
                return OptionState::Correct;
            }
            if index == selected {
                return OptionState::Selected;
            }
            return OptionState::Dimmed;
        }
        if index == selected {
            OptionState::Selected
        } else {
            OptionState::Plain
        }
    }
}
