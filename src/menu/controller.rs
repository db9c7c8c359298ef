// Query controller.
// Couples search text and category selection to the filter engine with debouncing and stale-result guarding.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;

use super::MenuItem;
use super::debounce::Debouncer;
use super::filter::{FilterCriteria, FilterEngine};
use super::loader::blocking;

/// Result of one filter invocation, tagged with the sequence number it started with.
#[derive(Debug)]
pub struct FilterUpdate {
    pub seq: u64,
    pub criteria: FilterCriteria,
    pub result: Result<Vec<MenuItem>>,
}

/// Owns the current criteria and the visible result set for one menu screen.
pub struct QueryController {
    engine: Arc<dyn FilterEngine>,
    criteria: FilterCriteria,
    ready: bool,
    debouncer: Debouncer,
    /// Last sequence number handed out; only its result may become visible.
    latest_seq: Arc<AtomicU64>,
    applied_seq: u64,
    results: Vec<MenuItem>,
    last_error: Option<String>,
    updates_tx: mpsc::UnboundedSender<FilterUpdate>,
    updates_rx: mpsc::UnboundedReceiver<FilterUpdate>,
}

impl QueryController {
    pub fn new(engine: Arc<dyn FilterEngine>, debounce: Duration) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            criteria: FilterCriteria::default(),
            ready: false,
            debouncer: Debouncer::new(debounce),
            latest_seq: Arc::new(AtomicU64::new(0)),
            applied_seq: 0,
            results: Vec::new(),
            last_error: None,
            updates_tx,
            updates_rx,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn results(&self) -> &[MenuItem] {
        &self.results
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.criteria.categories.contains(category)
    }

    /// The menu cache is loaded: filtering may start.
    /// Issues one immediate filter for whatever criteria were entered meanwhile.
    pub fn mark_ready(&mut self) {
        self.ready = true;
        self.debouncer.cancel();
        self.invoke_now();
    }

    /// Back to the not-ready state, e.g. while the cache is being refreshed.
    /// Invocations still running can no longer publish their results.
    pub fn mark_not_ready(&mut self) {
        self.ready = false;
        self.debouncer.cancel();
        self.latest_seq.fetch_add(1, Ordering::SeqCst);
    }

    /// A criteria change is waiting out the quiet period.
    pub fn is_searching(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.criteria.query {
            self.criteria.query = query;
            self.criteria_changed();
        }
    }

    /// Toggle a category; selecting an already selected one removes it.
    pub fn toggle_category(&mut self, category: &str) {
        self.criteria.toggle_category(category);
        self.criteria_changed();
    }

    pub fn clear_categories(&mut self) {
        if !self.criteria.categories.is_empty() {
            self.criteria.categories.clear();
            self.criteria_changed();
        }
    }

    fn criteria_changed(&mut self) {
        if !self.ready {
            return;
        }

        let engine = self.engine.clone();
        let criteria = self.criteria.clone();
        let latest_seq = self.latest_seq.clone();
        let tx = self.updates_tx.clone();
        self.debouncer.schedule(async move {
            let seq = latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::spawn(run_filter(engine, criteria, seq, tx));
        });
    }

    fn invoke_now(&mut self) {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::spawn(run_filter(
            self.engine.clone(),
            self.criteria.clone(),
            seq,
            self.updates_tx.clone(),
        ));
    }

    /// Apply a finished invocation. Returns true if it became the visible result.
    /// Anything but the most recently started invocation is discarded.
    pub fn apply(&mut self, update: FilterUpdate) -> bool {
        let latest = self.latest_seq.load(Ordering::SeqCst);
        if update.seq != latest || update.seq <= self.applied_seq {
            debug!(seq = update.seq, latest, "Discarding stale filter result");
            return false;
        }

        self.applied_seq = update.seq;
        debug!(
            seq = update.seq,
            query = %update.criteria.query,
            categories = update.criteria.categories.len(),
            "Applying filter result"
        );
        match update.result {
            Ok(items) => {
                self.results = items;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Filter query failed");
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Apply every finished invocation without waiting. Returns true if the visible set changed.
    pub fn poll_updates(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.updates_rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    /// Wait for the next finished invocation and apply it.
    #[cfg(test)]
    pub async fn next_update(&mut self) -> Option<bool> {
        let update = self.updates_rx.recv().await?;
        Some(self.apply(update))
    }

    #[cfg(test)]
    fn begin_invocation(&self) -> u64 {
        self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

async fn run_filter(
    engine: Arc<dyn FilterEngine>,
    criteria: FilterCriteria,
    seq: u64,
    tx: mpsc::UnboundedSender<FilterUpdate>,
) {
    debug!(seq, query = %criteria.query, "Running filter");
    let query_criteria = criteria.clone();
    let result = blocking(move || engine.filter(&query_criteria)).await;
    // The controller may be gone (screen closed); nothing left to update then.
    let _ = tx.send(FilterUpdate {
        seq,
        criteria,
        result,
    });
}
