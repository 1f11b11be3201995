//! Immutable query snapshots exchanged between the session and providers.

/// A snapshot of what the user has typed, plus the fuzzy-matching flag.
///
/// A new snapshot is created on every edit; snapshots are superseded,
/// never mutated, so they can be shared freely across round workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub fuzzy: bool,
}

impl Query {
    pub fn new(text: impl Into<String>, fuzzy: bool) -> Self {
        Self {
            text: text.into(),
            fuzzy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
