//! File search provider: finds files and folders under a base
//! directory, or under an explicit `~`/`/` path in the query.

use std::path::{Path, PathBuf};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use walkdir::WalkDir;

use beacon_core::{BeaconResult, Query, ResultItem, SearchProvider};

const MAX_FILE_RESULTS: usize = 50;

pub struct FileProvider {
    root: PathBuf,
    max_depth: usize,
}

impl FileProvider {
    pub fn new(root: PathBuf, max_depth: usize) -> Self {
        Self { root, max_depth }
    }

    /// Parse query into base path and search term
    /// Examples:
    ///   "~" -> (home_dir, "")
    ///   "~/Doc" -> (home_dir, "Doc")
    ///   "/etc/pas" -> (/etc, "pas")
    ///   "notes" -> (root, "notes")
    fn parse_query(&self, query: &str) -> (Option<PathBuf>, String) {
        let query = query.trim();
        if query.is_empty() {
            return (None, String::new());
        }

        let expanded = if let Some(rest) = query.strip_prefix('~') {
            let Some(home) = dirs::home_dir() else {
                return (None, String::new());
            };
            if rest.is_empty() {
                home.to_string_lossy().to_string()
            } else if let Some(sub) = rest.strip_prefix('/') {
                format!("{}/{}", home.display(), sub)
            } else {
                // ~something without / - treat ~ as home, rest as search
                return (Some(home), rest.to_string());
            }
        } else if query.starts_with('/') {
            query.to_string()
        } else {
            // No path prefix - search from the configured root
            return (Some(self.root.clone()), query.to_string());
        };

        let path = Path::new(&expanded);

        // An existing directory means: list its contents.
        if path.is_dir() {
            return (Some(path.to_path_buf()), String::new());
        }

        // Otherwise use the parent as base and the leaf as search term.
        if let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) {
            if parent.is_dir() {
                return (
                    Some(parent.to_path_buf()),
                    file_name.to_string_lossy().to_string(),
                );
            }
        }

        (None, String::new())
    }

    fn walk(&self, base_path: &Path, search_term: &str, fuzzy: bool) -> Vec<ResultItem> {
        let matcher = SkimMatcherV2::default();
        let search_lower = search_term.to_lowercase();
        let mut scored: Vec<(i64, ResultItem)> = Vec::new();

        let max_depth = if search_term.is_empty() { 1 } else { self.max_depth };

        for entry in WalkDir::new(base_path)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path() == base_path {
                continue;
            }

            // Skip hidden files unless the search term starts with .
            let file_name = entry.file_name().to_string_lossy();
            if file_name.starts_with('.') && !search_term.starts_with('.') {
                continue;
            }

            let score = if search_term.is_empty() {
                Some(0)
            } else if fuzzy {
                matcher.fuzzy_match(&file_name, search_term)
            } else if file_name.to_lowercase().contains(&search_lower) {
                Some(0)
            } else {
                None
            };

            if let Some(score) = score {
                let is_dir = entry.file_type().is_dir();
                let path = entry.path().display().to_string();
                let item = ResultItem::new(file_name.to_string())
                    .with_context(display_path(entry.path()))
                    .with_property("Path", path)
                    .with_property("Kind", if is_dir { "Directory" } else { "File" });
                scored.push((score, item));
            }

            if search_term.is_empty() && scored.len() >= MAX_FILE_RESULTS {
                break;
            }
        }

        // Best fuzzy scores first; plain listings keep walk order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(MAX_FILE_RESULTS)
            .map(|(_, item)| item)
            .collect()
    }
}

/// Path with ~ substituted for the home directory.
fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(suffix) = path.strip_prefix(&home) {
            return format!("~/{}", suffix.display());
        }
    }
    path.display().to_string()
}

impl SearchProvider for FileProvider {
    fn title(&self) -> &str {
        "Files"
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn supports(&self, text: &str) -> bool {
        !text.trim().is_empty()
    }

    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
        let (base_path, search_term) = self.parse_query(&query.text);

        let Some(base_path) = base_path else {
            return Ok(Vec::new());
        };
        if !base_path.exists() {
            return Ok(Vec::new());
        }

        Ok(self.walk(&base_path, &search_term, query.fuzzy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, FileProvider) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("report.txt"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("projects")).unwrap();
        fs::write(dir.path().join("projects").join("roadmap.md"), "").unwrap();
        let provider = FileProvider::new(dir.path().to_path_buf(), 4);
        (dir, provider)
    }

    fn names(items: &[ResultItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_substring_match_under_root() {
        let (_dir, provider) = fixture();
        let results = provider.search(&Query::new("read", false)).unwrap();
        assert_eq!(names(&results), vec!["readme.md"]);
    }

    #[test]
    fn test_fuzzy_match_spans_characters() {
        let (_dir, provider) = fixture();
        // "rdmp" is not a substring of roadmap.md but fuzzy-matches it.
        let plain = provider.search(&Query::new("rdmp", false)).unwrap();
        assert!(plain.is_empty());

        let fuzzy = provider.search(&Query::new("rdmp", true)).unwrap();
        assert_eq!(names(&fuzzy), vec!["roadmap.md"]);
    }

    #[test]
    fn test_hidden_files_skipped_unless_requested() {
        let (_dir, provider) = fixture();
        let results = provider.search(&Query::new("hidden", false)).unwrap();
        assert!(results.is_empty());

        let results = provider.search(&Query::new(".hidden", false)).unwrap();
        assert_eq!(names(&results), vec![".hidden"]);
    }

    #[test]
    fn test_absolute_directory_lists_contents() {
        let (dir, provider) = fixture();
        let query = dir.path().display().to_string();
        let results = provider.search(&Query::new(query, false)).unwrap();
        // Top-level, non-hidden entries only.
        let mut found = names(&results);
        found.sort_unstable();
        assert_eq!(found, vec!["projects", "readme.md", "report.txt"]);
    }

    #[test]
    fn test_results_carry_path_and_kind() {
        let (_dir, provider) = fixture();
        let results = provider.search(&Query::new("projects", false)).unwrap();
        assert_eq!(results[0].property("Kind"), Some("Directory"));
        assert!(results[0].property("Path").is_some());
    }

    #[test]
    fn test_blank_query_unsupported() {
        let (_dir, provider) = fixture();
        assert!(!provider.supports("  "));
        assert!(provider.supports("~/Doc"));
    }
}
