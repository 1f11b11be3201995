//! Default action factories for common result shapes.

use beacon_core::{ResultItem, SearchAction, SearchActionFactory};

/// Offers an "Open" action for results carrying a `Path`, `Location`
/// or `URL` property, handed to the platform opener.
pub struct OpenActionFactory;

fn target_of(result: &ResultItem) -> Option<&str> {
    result
        .property("Path")
        .or_else(|| result.property("Location"))
        .or_else(|| result.property("URL"))
}

impl SearchActionFactory for OpenActionFactory {
    fn supports(&self, result: &ResultItem) -> bool {
        target_of(result).is_some()
    }

    fn create(&self, result: &ResultItem) -> SearchAction {
        let target = target_of(result).unwrap_or_default().to_string();
        SearchAction::new("Open", true, move || {
            if let Err(err) = open::that(&target) {
                tracing::warn!(target = %target, error = %err, "failed to open location");
            }
        })
    }
}

/// Offers a "Copy" action for results carrying a `Value` property,
/// placing the value on the system clipboard.
pub struct CopyActionFactory;

impl SearchActionFactory for CopyActionFactory {
    fn supports(&self, result: &ResultItem) -> bool {
        result.property("Value").is_some()
    }

    fn create(&self, result: &ResultItem) -> SearchAction {
        let value = result.property("Value").unwrap_or_default().to_string();
        SearchAction::new("Copy", false, move || {
            let copied = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(value.clone()));
            if let Err(err) = copied {
                tracing::warn!(error = %err, "failed to copy value to clipboard");
            }
        })
    }
}
