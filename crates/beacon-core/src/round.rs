//! A single invalidatable unit of search work: one provider against
//! one query snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::event::{SearchEvent, SearchListener};
use crate::query::Query;
use crate::registry::ProviderEntry;

/// One provider's execution against one query snapshot.
///
/// The `valid` flag flips to false exactly once, when a newer
/// generation supersedes this one. Cancellation is advisory: the flag
/// is sampled before and after the provider call, never during, so an
/// in-flight call always runs to completion and only its emission is
/// suppressed.
pub struct SearchRound {
    entry: Arc<ProviderEntry>,
    query: Arc<Query>,
    valid: AtomicBool,
}

impl SearchRound {
    pub fn new(entry: Arc<ProviderEntry>, query: Arc<Query>) -> Self {
        Self {
            entry,
            query,
            valid: AtomicBool::new(true),
        }
    }

    /// Mark this round's eventual result as to-be-discarded.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Execute the round. Called exactly once, on a blocking worker.
    pub fn run(&self, listeners: &[Box<SearchListener>]) {
        let provider = self.entry.provider();
        let handle = self.entry.handle();

        // Re-evaluated here because the enabled toggle and the query's
        // exclusivity may have changed since the round was scheduled.
        let exclusive = provider.exclusive(&self.query.text);
        let supported = provider.supports(&self.query.text);
        let enabled = self.entry.is_enabled();

        if !self.is_valid() {
            return;
        }

        // Unsupported queries are "not applicable" (section omitted);
        // disabled providers report an empty list (section kept).
        let results = if !supported {
            None
        } else if !enabled {
            Some(Vec::new())
        } else {
            match provider.search(&self.query) {
                Ok(items) => Some(items),
                Err(err) => {
                    tracing::warn!(provider = %handle.title, error = %err, "provider search failed");
                    Some(Vec::new())
                }
            }
        };

        if !self.is_valid() {
            return;
        }

        let event = SearchEvent {
            provider: handle.clone(),
            results,
            exclusive,
        };
        for listener in listeners {
            listener(&event);
        }
    }
}
