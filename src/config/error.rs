use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the configuration store.
///
/// Read faults never show up here from `load`: they fall back to the
/// default document. Write faults and caller mistakes do.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to create config directory '{path}'")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config file '{path}' would be invalid after migration: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("Failed to serialize config")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write config file '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl ConfigError {
    /// True for ordinary caller mistakes, false for I/O faults.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ConfigError::Rejected(_))
    }
}

/// Reasons a mutating store operation refused to change anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Profile name must not be empty")]
    EmptyName,

    #[error("Auth token must not be empty")]
    EmptyToken,

    #[error("Profile '{0}' already exists")]
    DuplicateName(String),

    #[error("Profile '{0}' not found")]
    NotFound(String),

    #[error("Index {index} is out of range (have {len} profiles)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot remove the last remaining profile")]
    LastProfile,
}
