//! Wiki search provider: queries a MediaWiki `opensearch` endpoint.
//!
//! Network I/O happens inside `search`, which runs on a round worker;
//! a superseded query lets the request finish and discards the batch.

use beacon_core::{BeaconError, BeaconResult, Query, ResultItem, SearchProvider};

pub struct WikiProvider {
    endpoint: String,
    max_results: usize,
}

impl WikiProvider {
    pub fn new(endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_results,
        }
    }
}

/// Map an opensearch response (`[query, [titles], [descriptions],
/// [urls]]`) to result items.
fn parse_opensearch(body: &serde_json::Value) -> Vec<ResultItem> {
    let titles = body.get(1).and_then(|v| v.as_array());
    let descriptions = body.get(2).and_then(|v| v.as_array());
    let urls = body.get(3).and_then(|v| v.as_array());

    let (Some(titles), Some(urls)) = (titles, urls) else {
        return Vec::new();
    };

    titles
        .iter()
        .enumerate()
        .filter_map(|(idx, title)| {
            let title = title.as_str()?;
            let url = urls.get(idx).and_then(|v| v.as_str()).unwrap_or_default();
            let description = descriptions
                .and_then(|d| d.get(idx))
                .and_then(|v| v.as_str())
                .unwrap_or_default();

            let mut item = ResultItem::new(title)
                .with_context(url.to_string())
                .with_property("URL", url.to_string());
            if !description.is_empty() {
                item = item.with_body(description.to_string());
            }
            Some(item)
        })
        .collect()
}

impl SearchProvider for WikiProvider {
    fn title(&self) -> &str {
        "Wiki"
    }

    // Network provider: off until the user opts in.
    fn enabled_by_default(&self) -> bool {
        false
    }

    fn supports(&self, text: &str) -> bool {
        !text.trim().is_empty()
    }

    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
        let url = format!(
            "{}?action=opensearch&format=json&limit={}&search={}",
            self.endpoint,
            self.max_results,
            urlencoding::encode(query.text.trim()),
        );

        let response = reqwest::blocking::get(&url)
            .map_err(|e| BeaconError::Provider(format!("wiki request failed: {e}")))?;
        let body: serde_json::Value = response
            .json()
            .map_err(|e| BeaconError::Provider(format!("wiki response malformed: {e}")))?;

        Ok(parse_opensearch(&body))
    }
}
