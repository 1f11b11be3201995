//! Actions that can be executed on a selected result, produced by
//! registered factories with duplicate-label suppression.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::item::ResultItem;

/// A runnable action offered for a search result.
pub struct SearchAction {
    label: String,
    closes_search: bool,
    run: Box<dyn Fn() + Send + Sync>,
}

impl SearchAction {
    pub fn new(
        label: impl Into<String>,
        closes_search: bool,
        run: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            closes_search,
            run: Box::new(run),
        }
    }

    /// Display label; also the deduplication key.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether executing this action should close the search UI.
    pub fn closes_search(&self) -> bool {
        self.closes_search
    }

    pub fn run(&self) {
        (self.run)();
    }
}

impl std::fmt::Debug for SearchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAction")
            .field("label", &self.label)
            .field("closes_search", &self.closes_search)
            .finish()
    }
}

/// Knows how to generate actions for specific kinds of results.
pub trait SearchActionFactory: Send + Sync {
    /// Whether this factory can produce an action for the result.
    fn supports(&self, result: &ResultItem) -> bool;

    fn create(&self, result: &ResultItem) -> SearchAction;
}

struct FactoryEntry {
    factory: Arc<dyn SearchActionFactory>,
    priority: i32,
    order: usize,
}

/// Registry of action factories, consulted per selected result.
#[derive(Default)]
pub struct ActionRegistry {
    entries: RwLock<Vec<FactoryEntry>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, factory: Arc<dyn SearchActionFactory>, priority: i32) {
        let mut entries = self.entries.write();
        let order = entries.len();
        entries.push(FactoryEntry {
            factory,
            priority,
            order,
        });
    }

    /// All actions applicable to the result, in factory priority order
    /// (higher first, registration order breaking ties), with
    /// duplicate labels suppressed: the first action seen under a
    /// label wins and later ones are discarded.
    pub fn actions_for(&self, result: &ResultItem) -> Vec<SearchAction> {
        let entries = self.entries.read();
        let mut ranked: Vec<&FactoryEntry> = entries.iter().collect();
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.order.cmp(&b.order)));

        let mut seen: HashSet<String> = HashSet::new();
        let mut actions = Vec::new();
        for entry in ranked {
            if !entry.factory.supports(result) {
                continue;
            }
            let action = entry.factory.create(result);
            if seen.insert(action.label().to_string()) {
                actions.push(action);
            }
        }
        actions
    }
}
