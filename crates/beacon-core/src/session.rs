//! The search session: debounce timer, generation management and
//! per-provider fan-out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::event::SearchListener;
use crate::query::Query;
use crate::registry::ProviderRegistry;
use crate::round::SearchRound;

/// Timing knobs for the session driver.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the driver wakes up to check for pending edits.
    pub poll_interval: Duration,
    /// How long the query must stay unchanged before a search starts.
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            debounce: Duration::from_millis(200),
        }
    }
}

#[derive(Default)]
struct EditState {
    text: String,
    fuzzy: bool,
    last_edit: Option<Instant>,
}

/// A live, incremental search interaction.
///
/// Construct one per user interaction; every edit marks the shared
/// state and a background driver task decides when a new generation of
/// rounds begins. `update_query` and `set_fuzzy` never block. The
/// session is done once `terminate` is called (or it is dropped).
pub struct SearchSession {
    edits: Arc<Mutex<EditState>>,
    cancel: CancellationToken,
}

impl SearchSession {
    /// Spawn the driver task and return the caller-facing handle.
    ///
    /// Listener callbacks fire on provider worker threads, never on
    /// the driver or the thread calling `update_query`.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        config: SessionConfig,
        listeners: Vec<Box<SearchListener>>,
    ) -> Self {
        let edits = Arc::new(Mutex::new(EditState::default()));
        let cancel = CancellationToken::new();

        tokio::spawn(drive(
            registry,
            config,
            Arc::clone(&edits),
            cancel.clone(),
            Arc::new(listeners),
        ));

        Self { edits, cancel }
    }

    /// Record a new query string and restart the quiet-period count.
    pub fn update_query(&self, text: impl Into<String>) {
        let mut state = self.edits.lock();
        state.text = text.into();
        state.last_edit = Some(Instant::now());
    }

    /// Change the fuzzy flag; debounces exactly like a query edit.
    pub fn set_fuzzy(&self, fuzzy: bool) {
        let mut state = self.edits.lock();
        state.fuzzy = fuzzy;
        state.last_edit = Some(Instant::now());
    }

    /// Stop the driver after its current iteration and invalidate all
    /// outstanding rounds. Idempotent. Does not wait for in-flight
    /// provider calls; their output is simply dropped.
    pub fn terminate(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// The driver loop. Owns the round set of the current generation;
/// nothing else mutates it.
async fn drive(
    registry: Arc<ProviderRegistry>,
    config: SessionConfig,
    edits: Arc<Mutex<EditState>>,
    cancel: CancellationToken,
    listeners: Arc<Vec<Box<SearchListener>>>,
) {
    let mut rounds: Vec<Arc<SearchRound>> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }

        let query = {
            let mut state = edits.lock();
            match state.last_edit {
                // Nothing modified yet.
                None => continue,
                // Not enough quiet time since the last edit; wait longer.
                Some(at) if at.elapsed() < config.debounce => continue,
                Some(_) => {
                    state.last_edit = None;
                    Arc::new(Query::new(state.text.clone(), state.fuzzy))
                }
            }
        };

        // Time to start a new generation: supersede the old one first,
        // then spawn one worker per selected provider.
        invalidate_all(&mut rounds);
        tracing::debug!(query = %query.text, fuzzy = query.fuzzy, "starting search generation");

        for entry in registry.select_for(&query.text) {
            let round = Arc::new(SearchRound::new(entry, Arc::clone(&query)));
            rounds.push(Arc::clone(&round));
            let listeners = Arc::clone(&listeners);
            tokio::task::spawn_blocking(move || round.run(&listeners));
        }
    }

    invalidate_all(&mut rounds);
    tracing::debug!("search session terminated");
}

fn invalidate_all(rounds: &mut Vec<Arc<SearchRound>>) {
    for round in rounds.drain(..) {
        round.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BeaconResult;
    use crate::event::SearchEvent;
    use crate::item::ResultItem;
    use crate::provider::SearchProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingProvider {
        title: String,
        calls: Arc<AtomicUsize>,
        delay: Duration,
        exclusive_prefix: Option<&'static str>,
    }

    impl RecordingProvider {
        fn new(title: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                title: title.to_string(),
                calls: Arc::clone(&calls),
                delay: Duration::ZERO,
                exclusive_prefix: None,
            };
            (provider, calls)
        }
    }

    impl SearchProvider for RecordingProvider {
        fn title(&self) -> &str {
            &self.title
        }

        fn enabled_by_default(&self) -> bool {
            true
        }

        fn exclusive(&self, text: &str) -> bool {
            self.exclusive_prefix
                .is_some_and(|prefix| text.starts_with(prefix))
        }

        fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            Ok(vec![ResultItem::new(query.text.clone())])
        }
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(10),
            debounce: Duration::from_millis(50),
        }
    }

    fn capture() -> (Box<SearchListener>, Arc<Mutex<Vec<SearchEvent>>>) {
        let events: Arc<Mutex<Vec<SearchEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        (Box::new(move |event| sink.lock().push(event.clone())), events)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_debounce_waits_for_quiet_period() {
        let registry = Arc::new(ProviderRegistry::new());
        let (provider, calls) = RecordingProvider::new("Rec");
        registry.register(Arc::new(provider), 0);

        let config = SessionConfig {
            poll_interval: Duration::from_millis(20),
            debounce: Duration::from_millis(300),
        };
        let session = SearchSession::new(registry, config, Vec::new());

        // A burst of edits spaced below the debounce threshold.
        session.update_query("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.update_query("ab");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.update_query("abc");

        // Still inside the quiet period after the last edit.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // One generation once the quiet period elapses, not three.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        session.terminate();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stale_round_result_is_discarded() {
        let registry = Arc::new(ProviderRegistry::new());
        let (mut provider, calls) = RecordingProvider::new("Slow");
        provider.delay = Duration::from_millis(300);
        registry.register(Arc::new(provider), 0);

        let (listener, events) = capture();
        let session = SearchSession::new(Arc::clone(&registry), fast_config(), vec![listener]);

        session.update_query("one");
        // Let the first generation start and get stuck inside search().
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        session.update_query("two");
        tokio::time::sleep(Duration::from_millis(1000)).await;

        // Both generations ran the provider, but only the second one
        // was allowed to report.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let events = events.lock();
        assert_eq!(events.len(), 1);
        let results = events[0].results.as_ref().unwrap();
        assert_eq!(results[0].name, "two");

        session.terminate();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_exclusive_provider_runs_alone() {
        let registry = Arc::new(ProviderRegistry::new());
        let (plain, plain_calls) = RecordingProvider::new("Plain");
        let (mut bang, bang_calls) = RecordingProvider::new("Bang");
        bang.exclusive_prefix = Some("!");
        registry.register(Arc::new(plain), 10);
        registry.register(Arc::new(bang), 0);

        let (listener, events) = capture();
        let session = SearchSession::new(registry, fast_config(), vec![listener]);

        session.update_query("!snippet");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(plain_calls.load(Ordering::SeqCst), 0);
        assert_eq!(bang_calls.load(Ordering::SeqCst), 1);
        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].provider.title, "Bang");
        assert!(events[0].exclusive);

        session.terminate();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slow_provider_does_not_block_fast_one() {
        let registry = Arc::new(ProviderRegistry::new());
        let (mut slow, _) = RecordingProvider::new("Slow");
        slow.delay = Duration::from_millis(800);
        let (fast, _) = RecordingProvider::new("Fast");
        registry.register(Arc::new(slow), 0);
        registry.register(Arc::new(fast), 0);

        let (listener, events) = capture();
        let session = SearchSession::new(registry, fast_config(), vec![listener]);

        session.update_query("q");

        // The fast provider's event arrives while the slow one is
        // still inside its search call.
        tokio::time::sleep(Duration::from_millis(400)).await;
        {
            let events = events.lock();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].provider.title, "Fast");
        }

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(events.lock().len(), 2);

        session.terminate();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_terminate_stops_new_generations() {
        let registry = Arc::new(ProviderRegistry::new());
        let (provider, calls) = RecordingProvider::new("Rec");
        registry.register(Arc::new(provider), 0);

        let session = SearchSession::new(registry, fast_config(), Vec::new());
        session.terminate();
        session.terminate(); // idempotent

        session.update_query("after terminate");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
