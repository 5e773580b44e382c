//! Search-as-you-type over quiz creators
//!
//! Keystrokes go through a trailing [`Debouncer`]; each debounced query
//! carries a ticket so a delivery that raced a cancel is dropped. Lookups
//! run as tokio tasks and report back on the same channel tagged with a
//! generation, and only the newest generation may touch the panel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::client::{Creator, CreatorSearch};
use super::debounce::Debouncer;
use super::Navigation;
use crate::config::QuizpilotConfig;
use crate::Result;

/// Work delivered back to the controller
#[derive(Debug)]
pub enum SearchEvent {
    /// The quiet period after a keystroke elapsed
    Debounced { ticket: u64, query: String },
    /// A lookup finished
    Completed {
        generation: u64,
        query: String,
        result: Result<Vec<Creator>>,
    },
}

/// The dropdown under the search field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsPanel {
    pub visible: bool,
    pub items: Vec<Creator>,
}

impl ResultsPanel {
    fn hide(&mut self) {
        self.visible = false;
        self.items.clear();
    }
}

pub struct SearchController<C: CreatorSearch> {
    client: Arc<C>,
    min_chars: usize,
    field: String,
    panel: ResultsPanel,
    debouncer: Debouncer<SearchEvent>,
    tx: mpsc::UnboundedSender<SearchEvent>,
    rx: mpsc::UnboundedReceiver<SearchEvent>,
    ticket: u64,
    generation: u64,
    awaiting_debounce: bool,
    in_flight: Option<u64>,
}

impl<C: CreatorSearch> SearchController<C> {
    pub fn new(client: Arc<C>, debounce: Duration, min_chars: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            min_chars,
            field: String::new(),
            panel: ResultsPanel::default(),
            debouncer: Debouncer::new(debounce, tx.clone()),
            tx,
            rx,
            ticket: 0,
            generation: 0,
            awaiting_debounce: false,
            in_flight: None,
        }
    }

    pub fn from_config(client: Arc<C>, config: &QuizpilotConfig) -> Self {
        Self::new(client, config.search_debounce, config.min_query_chars)
    }

    /// Text currently in the search field
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn panel(&self) -> &ResultsPanel {
        &self.panel
    }

    /// A debounce is running or a lookup is still out
    pub fn is_busy(&self) -> bool {
        self.awaiting_debounce || self.in_flight.is_some()
    }

    /// The field now holds `value`. Must run inside a tokio runtime.
    pub fn on_input(&mut self, value: &str) {
        self.field = value.to_string();
        let query = value.trim();
        self.ticket += 1;

        if query.chars().count() < self.min_chars {
            self.cancel_pending();
            self.panel.hide();
            return;
        }

        self.awaiting_debounce = true;
        debug!("Waiting {:?} before searching {:?}", self.debouncer.delay(), query);
        self.debouncer.trigger(SearchEvent::Debounced {
            ticket: self.ticket,
            query: query.to_string(),
        });
    }

    /// Apply one event. Returns whether the panel changed.
    pub fn handle(&mut self, event: SearchEvent) -> bool {
        match event {
            SearchEvent::Debounced { ticket, query } => {
                if ticket != self.ticket {
                    debug!("Dropping superseded debounce for {:?}", query);
                    return false;
                }
                self.awaiting_debounce = false;
                self.dispatch(query);
                false
            }
            SearchEvent::Completed {
                generation,
                query,
                result,
            } => {
                if generation != self.generation {
                    debug!(
                        "Discarding stale results for {:?} (generation {} < {})",
                        query, generation, self.generation
                    );
                    return false;
                }
                self.in_flight = None;
                match result {
                    Ok(creators) if creators.is_empty() => {
                        let changed = self.panel.visible;
                        self.panel.hide();
                        changed
                    }
                    Ok(creators) => {
                        debug!("{} creator(s) match {:?}", creators.len(), query);
                        self.panel.items = creators;
                        self.panel.visible = true;
                        true
                    }
                    Err(e) => {
                        warn!("Creator search for {:?} failed: {}", query, e);
                        false
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, query: String) {
        self.generation += 1;
        let generation = self.generation;
        self.in_flight = Some(generation);
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        debug!("Searching creators for {:?} (generation {})", query, generation);
        tokio::spawn(async move {
            let result = client.search_creators(&query).await;
            let _ = tx.send(SearchEvent::Completed {
                generation,
                query,
                result,
            });
        });
    }

    /// Drop the pending debounce and orphan any lookup in flight.
    fn cancel_pending(&mut self) {
        self.debouncer.cancel();
        self.awaiting_debounce = false;
        self.generation += 1;
        self.in_flight = None;
    }

    /// Apply every event already queued. Returns whether the panel changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.handle(event);
        }
        changed
    }

    /// Wait for the next event. The controller keeps a sender alive, so
    /// this only returns `None` if the channel is closed from outside.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        self.rx.recv().await
    }

    /// Take the result at `index`: copy it into the field and close the
    /// panel.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let creator = self.panel.items.get(index)?.clone();
        self.field = creator.username;
        self.ticket += 1;
        self.cancel_pending();
        self.panel.hide();
        Some(self.field.as_str())
    }

    /// Enter in the field: jump straight to the filtered listing.
    pub fn on_enter(&mut self, path: &str) -> Navigation {
        self.ticket += 1;
        self.cancel_pending();
        self.panel.hide();
        Navigation::filtered(path, &self.field)
    }
}
