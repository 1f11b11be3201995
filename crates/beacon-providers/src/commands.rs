//! Command palette provider: searches registered application commands
//! by title and menu path.

use beacon_core::{BeaconResult, Query, ResultItem, SearchProvider};
use std::collections::HashSet;

/// One registered command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub menu_path: Vec<String>,
    pub description: String,
    /// Where the command is defined; shown in the details pane and
    /// consumed by the open-location action.
    pub location: Option<String>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, menu_path: &[&str], description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            menu_path: menu_path.iter().map(|s| s.to_string()).collect(),
            description: description.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    fn menu(&self) -> String {
        self.menu_path.join(" > ")
    }
}

/// Built-in application commands
pub fn builtin_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("Settings", &["Beacon"], "Open Beacon settings"),
        CommandSpec::new("Quit Beacon", &["Beacon"], "Close Beacon completely"),
        CommandSpec::new("Reload Config", &["Beacon"], "Reload configuration from disk"),
        CommandSpec::new("Lock Screen", &["System"], "Lock the screen"),
        CommandSpec::new("Sleep", &["System"], "Put computer to sleep"),
        CommandSpec::new("Restart", &["System"], "Restart the computer"),
        CommandSpec::new("Shut Down", &["System"], "Shut down the computer"),
    ]
}

/// Provider over a fixed command table.
///
/// Matching runs in ranked passes: title prefix, then title substring,
/// then menu substring, then all words in title, then all words in the
/// menu path; a command is kept at its first (best) rank.
pub struct CommandProvider {
    commands: Vec<CommandSpec>,
}

impl CommandProvider {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    fn matches(&self, text: &str) -> Vec<&CommandSpec> {
        let text_lower = text.to_lowercase();
        let parts: Vec<&str> = text_lower.split_whitespace().collect();

        let mut seen: HashSet<usize> = HashSet::new();
        let mut matches: Vec<&CommandSpec> = Vec::new();

        add_pass(&self.commands, &mut seen, &mut matches, |cmd| {
            cmd.name.to_lowercase().starts_with(&text_lower)
        });
        add_pass(&self.commands, &mut seen, &mut matches, |cmd| {
            cmd.name.to_lowercase().contains(&text_lower)
        });
        add_pass(&self.commands, &mut seen, &mut matches, |cmd| {
            cmd.menu().to_lowercase().contains(&text_lower)
        });
        add_pass(&self.commands, &mut seen, &mut matches, |cmd| {
            let name = cmd.name.to_lowercase();
            !parts.is_empty() && parts.iter().all(|part| name.contains(part))
        });
        add_pass(&self.commands, &mut seen, &mut matches, |cmd| {
            let menu = cmd.menu().to_lowercase();
            !parts.is_empty() && parts.iter().all(|part| menu.contains(part))
        });

        matches
    }
}

/// Add commands matching the predicate to `matches`, skipping ones a
/// previous (higher-ranked) pass already claimed.
fn add_pass<'a>(
    commands: &'a [CommandSpec],
    seen: &mut HashSet<usize>,
    matches: &mut Vec<&'a CommandSpec>,
    pred: impl Fn(&CommandSpec) -> bool,
) {
    for (idx, cmd) in commands.iter().enumerate() {
        if !seen.contains(&idx) && pred(cmd) {
            seen.insert(idx);
            matches.push(cmd);
        }
    }
}

impl SearchProvider for CommandProvider {
    fn title(&self) -> &str {
        "Commands"
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .matches(&query.text)
            .into_iter()
            .map(|cmd| {
                let mut item = ResultItem::new(cmd.name.clone())
                    .with_context(cmd.menu())
                    .with_property("Menu", cmd.menu())
                    .with_property("Description", cmd.description.clone());
                if let Some(location) = &cmd.location {
                    item = item.with_property("Location", location.clone());
                }
                item
            })
            .collect())
    }
}
