use thiserror::Error;

/// Errors that can occur in Beacon
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias for Beacon operations
pub type BeaconResult<T> = Result<T, BeaconError>;

impl From<std::io::Error> for BeaconError {
    fn from(err: std::io::Error) -> Self {
        BeaconError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for BeaconError {
    fn from(err: toml::de::Error) -> Self {
        BeaconError::Config(err.to_string())
    }
}
