//! The typed result entry exchanged between providers and the consumer.

/// One key/value pair attached to a result.
///
/// A `None` key marks the value as freeform body text rather than a
/// labelled property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: Option<String>,
    pub value: String,
}

/// One entry in a provider's result list.
///
/// Immutable once built; rounds hand these to listeners by value and
/// aggregation snapshots share them read-only across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// Title of the result, intended for detailed display.
    pub name: String,
    /// Short name, intended for display in the list of results.
    pub identifier: String,
    /// Where the result comes from (a path, a menu, a URL...).
    pub context: String,
    /// Optional icon reference; interpretation is up to the renderer.
    pub icon: Option<String>,
    /// Ordered properties shown in the details pane.
    pub properties: Vec<Property>,
}

impl ResultItem {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identifier: name.clone(),
            name,
            context: String::new(),
            icon: None,
            properties: Vec::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Append a labelled property, preserving insertion order.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property {
            key: Some(key.into()),
            value: value.into(),
        });
        self
    }

    /// Append freeform body text (a property without a key).
    pub fn with_body(mut self, value: impl Into<String>) -> Self {
        self.properties.push(Property {
            key: None,
            value: value.into(),
        });
        self
    }

    /// Look up the first property with the given key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key.as_deref() == Some(key))
            .map(|p| p.value.as_str())
    }
}
