//! Landing screen decoration
//!
//! Purely cosmetic state: counters, the typing headline, the particle
//! field, the demo question, reveal-on-scroll and parallax. Everything is
//! advanced by elapsed time so the render loop decides the frame rate.

mod counter;
mod demo;
mod particles;
mod typing;

pub use counter::{group_thousands, StatCounter, COUNT_UP_DURATION, FRAME};
pub use demo::{DemoQuiz, OptionState};
pub use particles::{Link, Particle, ParticleField, LINK_DISTANCE, PARTICLE_COUNT};
pub use typing::TypingLoop;

use std::time::Duration;

use crate::page::LandingPage;

/// Hero offset for a scroll position
pub fn parallax_offset(scroll: f64) -> f64 {
    scroll * -0.5
}

/// Sections that animate in the first time they are scrolled into view.
#[derive(Debug, Clone)]
pub struct Reveal {
    revealed: Vec<bool>,
}

impl Reveal {
    pub fn new(sections: usize) -> Self {
        Self {
            revealed: vec![false; sections],
        }
    }

    /// Returns true the first time `index` becomes visible.
    pub fn mark_visible(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }
}

/// Section order on the landing screen
pub const HERO_SECTION: usize = 0;
pub const STATS_SECTION: usize = 1;
pub const FEATURES_SECTION: usize = 2;
pub const DEMO_SECTION: usize = 3;
const SECTION_COUNT: usize = 4;

/// Everything moving on the landing screen.
pub struct LandingScene {
    pub page: LandingPage,
    pub counters: Vec<StatCounter>,
    pub typing: TypingLoop,
    pub particles: ParticleField,
    pub demo: Option<DemoQuiz>,
    pub reveal: Reveal,
    scroll: f64,
    frame_debt: Duration,
}

impl LandingScene {
    pub fn new(page: LandingPage, width: f64, height: f64) -> Self {
        let counters = page.stats.iter().map(|s| StatCounter::new(s.count)).collect();
        let typing = TypingLoop::new(page.typing_texts.clone());
        let demo = page.demo.clone().map(DemoQuiz::new);
        let mut reveal = Reveal::new(SECTION_COUNT);
        reveal.mark_visible(HERO_SECTION);
        Self {
            page,
            counters,
            typing,
            particles: ParticleField::new(width, height),
            demo,
            reveal,
            scroll: 0.0,
            frame_debt: Duration::ZERO,
        }
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn hero_offset(&self) -> f64 {
        parallax_offset(self.scroll)
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll = (self.scroll + delta).max(0.0);
    }

    /// A section came into view.
    pub fn section_visible(&mut self, index: usize) {
        if self.reveal.mark_visible(index) && index == STATS_SECTION {
            for counter in &mut self.counters {
                counter.start();
            }
        }
    }

    /// Advance all animations by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) {
        self.typing.advance(elapsed);
        if let Some(demo) = &mut self.demo {
            demo.advance(elapsed);
        }

        self.frame_debt += elapsed;
        while self.frame_debt >= FRAME {
            self.frame_debt -= FRAME;
            self.particles.step();
            for counter in &mut self.counters {
                counter.frame();
            }
        }
    }
}
