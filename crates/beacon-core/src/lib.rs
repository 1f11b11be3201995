//! Core of the Beacon launcher: an incremental, multi-source search
//! orchestrator. As the user types, edits are debounced; each quiet
//! period starts a generation of concurrent per-provider rounds whose
//! results stream back to listeners, with stale rounds invalidated.

pub mod action;
pub mod aggregator;
pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod provider;
pub mod query;
pub mod registry;
pub mod round;
pub mod session;

pub use action::{ActionRegistry, SearchAction, SearchActionFactory};
pub use aggregator::{ResultAggregator, Section};
pub use config::Config;
pub use error::{BeaconError, BeaconResult};
pub use event::{SearchEvent, SearchListener};
pub use item::{Property, ResultItem};
pub use provider::SearchProvider;
pub use query::Query;
pub use registry::{PreferenceStore, ProviderHandle, ProviderRegistry, TomlPreferences};
pub use session::{SearchSession, SessionConfig};
