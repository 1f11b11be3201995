//! Consumer-side aggregation of per-provider result events into an
//! ordered, capped view.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::event::SearchEvent;
use crate::item::ResultItem;

/// One provider's section in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub results: Vec<ResultItem>,
}

/// Folds result events into a displayable snapshot.
///
/// Internally locked: events arrive on provider worker threads, in no
/// particular inter-provider order, and may race with snapshot reads.
pub struct ResultAggregator {
    /// Latest event per provider id for the current generation.
    events: Mutex<HashMap<String, SearchEvent>>,
    /// Per-section result cap.
    cap: usize,
}

impl ResultAggregator {
    pub fn new(cap: usize) -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
            cap,
        }
    }

    /// Store the latest event for its provider. An exclusive event
    /// clears everything else first, so the snapshot only ever shows
    /// the exclusive provider's section.
    pub fn on_event(&self, event: &SearchEvent) {
        let mut events = self.events.lock();
        if event.exclusive {
            events.clear();
        }
        events.insert(event.provider.id.clone(), event.clone());
    }

    /// The current view: sections ordered by provider priority
    /// (higher first, registration order breaking ties), results in
    /// provider order truncated to the cap. Providers that reported
    /// zero results appear as empty sections; "not applicable"
    /// providers are omitted entirely.
    pub fn snapshot(&self) -> Vec<Section> {
        let events = self.events.lock();
        let mut ordered: Vec<&SearchEvent> = events.values().collect();
        ordered.sort_by(|a, b| {
            b.provider
                .priority
                .cmp(&a.provider.priority)
                .then(a.provider.order.cmp(&b.provider.order))
        });

        ordered
            .into_iter()
            .filter_map(|event| {
                event.results.as_ref().map(|results| Section {
                    title: event.provider.title.clone(),
                    results: results.iter().take(self.cap).cloned().collect(),
                })
            })
            .collect()
    }

    /// Drop all stored events, e.g. when a new interaction begins.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderHandle;

    fn handle(id: &str, priority: i32, order: usize) -> ProviderHandle {
        ProviderHandle {
            id: id.to_string(),
            title: id.to_string(),
            priority,
            order,
        }
    }

    fn event(id: &str, priority: i32, order: usize, names: &[&str]) -> SearchEvent {
        SearchEvent {
            provider: handle(id, priority, order),
            results: Some(names.iter().map(|n| ResultItem::new(*n)).collect()),
            exclusive: false,
        }
    }

    #[test]
    fn test_sections_ordered_by_priority() {
        let agg = ResultAggregator::new(8);
        agg.on_event(&event("Low", 5, 0, &["b"]));
        agg.on_event(&event("High", 10, 1, &["a"]));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].title, "High");
        assert_eq!(snapshot[1].title, "Low");
    }

    #[test]
    fn test_priority_ties_break_by_registration_order() {
        let agg = ResultAggregator::new(8);
        agg.on_event(&event("Second", 5, 1, &[]));
        agg.on_event(&event("First", 5, 0, &[]));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot[0].title, "First");
        assert_eq!(snapshot[1].title, "Second");
    }

    #[test]
    fn test_results_capped_preserving_provider_order() {
        let agg = ResultAggregator::new(8);
        let names: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        agg.on_event(&event("Many", 0, 0, &refs));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot[0].results.len(), 8);
        assert_eq!(snapshot[0].results[0].name, "r0");
        assert_eq!(snapshot[0].results[7].name, "r7");
    }

    #[test]
    fn test_exclusive_event_clears_other_sections() {
        let agg = ResultAggregator::new(8);
        agg.on_event(&event("Normal", 10, 0, &["a"]));

        let mut exclusive = event("Bang", 0, 1, &["b"]);
        exclusive.exclusive = true;
        agg.on_event(&exclusive);

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Bang");
    }

    #[test]
    fn test_empty_results_keep_section_not_applicable_omits_it() {
        let agg = ResultAggregator::new(8);
        agg.on_event(&event("Empty", 5, 0, &[]));
        agg.on_event(&SearchEvent {
            provider: handle("Skipped", 10, 1),
            results: None,
            exclusive: false,
        });

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Empty");
        assert!(snapshot[0].results.is_empty());
    }

    #[test]
    fn test_newer_event_overwrites_same_provider() {
        let agg = ResultAggregator::new(8);
        agg.on_event(&event("P", 0, 0, &["old"]));
        agg.on_event(&event("P", 0, 0, &["new"]));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].results[0].name, "new");
    }
}
