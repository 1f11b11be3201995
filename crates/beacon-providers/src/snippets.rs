//! Snippet provider: exclusive handler for `!` and `#!` queries,
//! offering to run the typed snippet with each configured runner.
//!
//! `!print(2)` matches every runner; `#!py print(2)` restricts the
//! runners to those whose name or alias matches the hint.

use beacon_core::{BeaconResult, Query, ResultItem, SearchProvider};

/// A script runner snippets can be executed with.
#[derive(Debug, Clone)]
pub struct SnippetRunner {
    pub name: String,
    pub aliases: Vec<String>,
}

impl SnippetRunner {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches_hint(&self, hint: &str) -> bool {
        let hint = hint.to_lowercase();
        self.name.to_lowercase().contains(&hint)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase().contains(&hint))
    }
}

pub struct SnippetProvider {
    runners: Vec<SnippetRunner>,
}

impl SnippetProvider {
    pub fn new(runners: Vec<SnippetRunner>) -> Self {
        Self { runners }
    }

    fn results(&self, runners: Vec<&SnippetRunner>, snippet: &str) -> Vec<ResultItem> {
        runners
            .into_iter()
            .map(|runner| {
                ResultItem::new(snippet.to_string())
                    .with_identifier(runner.name.clone())
                    .with_context(format!("{} snippet", runner.name))
                    .with_property("Runner", runner.name.clone())
                    .with_body(snippet.to_string())
            })
            .collect()
    }
}

fn is_snippet_query(text: &str) -> bool {
    text.starts_with("#!") || text.starts_with('!')
}

impl SearchProvider for SnippetProvider {
    fn title(&self) -> &str {
        "Snippets"
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn supports(&self, text: &str) -> bool {
        is_snippet_query(text)
    }

    fn exclusive(&self, text: &str) -> bool {
        is_snippet_query(text)
    }

    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
        let text = query.text.as_str();

        if let Some(rest) = text.strip_prefix("#!") {
            // "#!hint snippet": restrict runners to the hint.
            let mut tokens = rest.splitn(2, char::is_whitespace);
            let hint = tokens.next().unwrap_or_default();
            let Some(snippet) = tokens.next() else {
                return Ok(Vec::new());
            };
            let runners = self
                .runners
                .iter()
                .filter(|runner| runner.matches_hint(hint))
                .collect();
            return Ok(self.results(runners, snippet));
        }

        if let Some(snippet) = text.strip_prefix('!') {
            if snippet.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(self.results(self.runners.iter().collect(), snippet));
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SnippetProvider {
        SnippetProvider::new(vec![
            SnippetRunner::new("Python", &["py"]),
            SnippetRunner::new("Lua", &[]),
        ])
    }

    #[test]
    fn test_bang_query_matches_all_runners() {
        let results = provider().search(&Query::new("!print(2)", false)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].property("Runner"), Some("Python"));
        assert_eq!(results[1].property("Runner"), Some("Lua"));
        assert_eq!(results[0].name, "print(2)");
    }

    #[test]
    fn test_shebang_hint_filters_runners() {
        let results = provider()
            .search(&Query::new("#!py print(2)", false))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].property("Runner"), Some("Python"));
    }

    #[test]
    fn test_shebang_without_snippet_yields_nothing() {
        let results = provider().search(&Query::new("#!py", false)).unwrap();
        assert!(results.is_empty());

        let results = provider().search(&Query::new("!", false)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_claims_exclusivity_for_prefixes_only() {
        let provider = provider();
        assert!(provider.exclusive("!x"));
        assert!(provider.exclusive("#!py x"));
        assert!(!provider.exclusive("plain"));
        assert!(!provider.supports("plain"));
    }
}
