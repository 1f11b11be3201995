//! Events emitted when a search round completes.

use crate::item::ResultItem;
use crate::registry::ProviderHandle;

/// A batch of results from one completed, still-valid search round.
///
/// Emitted at most once per round, on the round's own worker thread.
/// Listeners that need to touch single-threaded state must requeue
/// onto their own thread.
#[derive(Debug, Clone)]
pub struct SearchEvent {
    pub provider: ProviderHandle,
    /// The provider's ranked results, or `None` if the provider
    /// reported the query as not applicable.
    pub results: Option<Vec<ResultItem>>,
    /// Whether the provider claimed exclusive rights to this query.
    pub exclusive: bool,
}

/// Callback notified per completed round.
pub type SearchListener = dyn Fn(&SearchEvent) + Send + Sync;
