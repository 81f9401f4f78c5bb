//! Error types for the monitoring pipeline.

use std::path::PathBuf;

use thiserror::Error;


/// Result alias used at every use-case boundary.
pub type GuardResult<T> = std::result::Result<T, GuardError>;


/// Failures a pipeline operation can report to its caller.
///
/// None of these are fatal to the daemon: the worst case is a skipped tick.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read traffic counters from {path}: {details}")]
    CounterRead { path: PathBuf, details: String },

    #[error("failed to enumerate installed packages from {path}: {details}")]
    PackageRead { path: PathBuf, details: String },

    #[error("foreground usage query failed: {details}")]
    ForegroundQuery { details: String },

    #[error("privileged network policy interface unavailable")]
    PolicyUnavailable,

    #[error("network policy change for uid {uid} rejected: {details}")]
    PolicyDenied { uid: u32, details: String },

    #[error("failed to open mobile data settings: {details}")]
    SettingsLaunch { details: String },

    #[error("IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store failure: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {details}")]
    Config { details: String },
}
