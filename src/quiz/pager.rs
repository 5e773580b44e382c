//! One-question-at-a-time navigation

/// Enabled/visible state of the navigation controls for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub submit_visible: bool,
}

/// One indicator dot per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorDot {
    pub index: usize,
    pub current: bool,
    pub answered: bool,
}

#[derive(Debug, Clone)]
pub struct Pager {
    total: usize,
    current: usize,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self { total, current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }

    /// Jump to `index`. Returns false when out of range or already there.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn controls(&self) -> PagerControls {
        PagerControls {
            prev_enabled: self.current > 0,
            next_enabled: !self.is_last(),
            submit_visible: self.is_last(),
        }
    }

    /// Dots reflect the current page and the answered set independently.
    pub fn dots(&self, answered: impl Fn(usize) -> bool) -> Vec<IndicatorDot> {
        (0..self.total)
            .map(|index| IndicatorDot {
                index,
                current: index == self.current,
                answered: answered(index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_at_edges() {
        let mut pager = Pager::new(3);
        assert_eq!(
            pager.controls(),
            PagerControls { prev_enabled: false, next_enabled: true, submit_visible: false }
        );

        assert!(pager.next());
        assert_eq!(
            pager.controls(),
            PagerControls { prev_enabled: true, next_enabled: true, submit_visible: false }
        );

        assert!(pager.next());
        assert!(!pager.next());
        assert_eq!(
            pager.controls(),
            PagerControls { prev_enabled: true, next_enabled: false, submit_visible: true }
        );
    }

    #[test]
    fn test_prev_at_first_page_is_noop() {
        let mut pager = Pager::new(2);
        assert!(!pager.prev());
        assert_eq!(pager.current(), 0);
    }

    #[test]
    fn test_go_to_out_of_range() {
        let mut pager = Pager::new(2);
        assert!(!pager.go_to(5));
        assert!(pager.go_to(1));
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_dots_track_current_and_answered_independently() {
        let mut pager = Pager::new(3);
        pager.go_to(2);
        let dots = pager.dots(|i| i == 0);
        assert!(dots[0].answered && !dots[0].current);
        assert!(!dots[1].answered && !dots[1].current);
        assert!(!dots[2].answered && dots[2].current);
    }

    #[test]
    fn test_single_question_shows_submit() {
        let pager = Pager::new(1);
        let controls = pager.controls();
        assert!(controls.submit_visible);
        assert!(!controls.prev_enabled && !controls.next_enabled);
    }
}
