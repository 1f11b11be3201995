//! Search provider trait: the contract each search source implements.

use crate::error::BeaconResult;
use crate::item::ResultItem;
use crate::query::Query;

/// A pluggable source of search results.
///
/// Implementations are called once per query snapshot and return an
/// already-ranked, finite list of results. The call may block (network
/// I/O is allowed); it runs on a dedicated worker, never the thread
/// that edits the query.
pub trait SearchProvider: Send + Sync {
    /// Short descriptive string identifying the sort of results found
    /// by this provider. Used as a category title and grouping key, so
    /// it must be unique within a registry.
    fn title(&self) -> &str;

    /// Whether this provider is applicable to the given text at all.
    fn supports(&self, _text: &str) -> bool {
        true
    }

    /// Whether this provider wants exclusive rights to the given text
    /// (e.g. queries with a special prefix). An exclusive provider
    /// suppresses all others for that query.
    fn exclusive(&self, _text: &str) -> bool {
        false
    }

    /// Enabled state used when no persisted preference exists.
    fn enabled_by_default(&self) -> bool {
        false
    }

    /// Searches for the given query.
    ///
    /// Errors are recovered at the round boundary: logged and turned
    /// into an empty result list, never propagated to other providers
    /// or the session driver.
    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>>;
}
