use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Topica.
///
/// Every error is fatal to the current clustering run. There is no partial
/// result and no fallback clustering; callers surface the error and stop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TopicaError {
    #[error("Input format error: {0}")]
    InputFormat(String),

    #[error("Empty corpus: at least one document is required")]
    EmptyCorpus,

    #[error("Failed to load resource {}: {source}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TopicaError {
    /// Wrap an I/O failure on a named resource (stop-word list, input file).
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TopicaError::ResourceLoad {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for TopicaError {
    fn from(err: toml::de::Error) -> Self {
        TopicaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TopicaError {
    fn from(err: toml::ser::Error) -> Self {
        TopicaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TopicaError {
    fn from(err: serde_json::Error) -> Self {
        TopicaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Topica operations.
pub type Result<T> = std::result::Result<T, TopicaError>;
