//! Provider registry: an explicit registration table with per-provider
//! enable/disable state persisted through a preference store.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::{BeaconError, BeaconResult};
use crate::provider::SearchProvider;

/// Identity and ordering metadata stamped onto a provider at
/// registration time. Carried inside every event so consumers can
/// key and sort sections without holding the provider itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHandle {
    /// Registry key; the provider's title.
    pub id: String,
    /// Display name for the section header.
    pub title: String,
    /// Higher priority providers are listed first.
    pub priority: i32,
    /// Registration order; the stable tie-break for equal priorities.
    pub order: usize,
}

/// A registered provider plus its runtime enabled flag.
///
/// The flag is atomic so round workers can read it while the UI writes
/// it; a stale read is acceptable, the round simply acts on the state
/// it observed.
pub struct ProviderEntry {
    provider: Arc<dyn SearchProvider>,
    handle: ProviderHandle,
    enabled: AtomicBool,
}

impl ProviderEntry {
    pub fn provider(&self) -> &Arc<dyn SearchProvider> {
        &self.provider
    }

    pub fn handle(&self) -> &ProviderHandle {
        &self.handle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Persisted enable/disable preferences, keyed by provider id.
pub trait PreferenceStore: Send + Sync {
    fn get_enabled(&self, id: &str) -> Option<bool>;
    fn set_enabled(&self, id: &str, enabled: bool) -> BeaconResult<()>;
}

/// Registry of search providers, in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: RwLock<Vec<Arc<ProviderEntry>>>,
    prefs: Option<Box<dyn PreferenceStore>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefs(prefs: Box<dyn PreferenceStore>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            prefs: Some(prefs),
        }
    }

    /// Register a provider with the given priority.
    ///
    /// The initial enabled state comes from the preference store if a
    /// value was persisted, otherwise from the provider's own default.
    pub fn register(&self, provider: Arc<dyn SearchProvider>, priority: i32) -> ProviderHandle {
        let id = provider.title().to_string();
        let enabled = self
            .prefs
            .as_ref()
            .and_then(|p| p.get_enabled(&id))
            .unwrap_or_else(|| provider.enabled_by_default());

        let mut entries = self.entries.write();
        let handle = ProviderHandle {
            title: id.clone(),
            id,
            priority,
            order: entries.len(),
        };
        entries.push(Arc::new(ProviderEntry {
            provider,
            handle: handle.clone(),
            enabled: AtomicBool::new(enabled),
        }));
        handle
    }

    /// All registered providers, in registration order.
    pub fn providers(&self) -> Vec<Arc<ProviderEntry>> {
        self.entries.read().clone()
    }

    pub fn enabled(&self, id: &str) -> bool {
        self.entries
            .read()
            .iter()
            .find(|e| e.handle.id == id)
            .is_some_and(|e| e.is_enabled())
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) {
        if let Some(entry) = self.entries.read().iter().find(|e| e.handle.id == id) {
            entry.enabled.store(enabled, Ordering::Relaxed);
        }
        if let Some(prefs) = &self.prefs {
            if let Err(err) = prefs.set_enabled(id, enabled) {
                tracing::warn!(provider = id, error = %err, "failed to persist provider preference");
            }
        }
    }

    /// The providers that should run for the given query text.
    ///
    /// If any provider claims exclusive rights to the text, the first
    /// such provider (in registration order) runs alone; otherwise all
    /// providers run.
    pub fn select_for(&self, text: &str) -> Vec<Arc<ProviderEntry>> {
        let entries = self.entries.read().clone();
        match entries.iter().find(|e| e.provider.exclusive(text)) {
            Some(exclusive) => vec![Arc::clone(exclusive)],
            None => entries,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    providers: BTreeMap<String, bool>,
}

/// Preference store backed by a TOML file (`providers.toml` next to
/// the main config).
pub struct TomlPreferences {
    path: PathBuf,
    cache: Mutex<PrefsFile>,
}

impl TomlPreferences {
    pub fn open(path: PathBuf) -> Self {
        let cache = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                    tracing::warn!(path = %path.display(), error = %err, "failed to parse provider preferences");
                    PrefsFile::default()
                }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read provider preferences");
                    PrefsFile::default()
                }
            }
        } else {
            PrefsFile::default()
        };

        Self {
            path,
            cache: Mutex::new(cache),
        }
    }
}

impl PreferenceStore for TomlPreferences {
    fn get_enabled(&self, id: &str) -> Option<bool> {
        self.cache.lock().providers.get(id).copied()
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> BeaconResult<()> {
        let mut cache = self.cache.lock();
        cache.providers.insert(id.to_string(), enabled);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&*cache)
            .map_err(|e| BeaconError::Preferences(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
