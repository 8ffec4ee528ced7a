use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

/// A composite key whose leading segments match no configured test area
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Path {key} doesn't match spec path pattern: {reason}")]
pub struct ClassificationError {
    pub key: String,
    pub reason: String,
}

impl ClassificationError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error at {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] specmap_metadata::ParseError),

    #[error("Test {path} belongs to unconfigured area `{area}`")]
    UnknownArea { area: String, path: String },
}

impl IndexerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
