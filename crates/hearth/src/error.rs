//! Error types for storage and theme operations.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised by a [`PreferenceStore`](crate::PreferenceStore) backend.
///
/// These never reach callers of the best-effort `load`/`save` methods;
/// they are logged there and swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The write would grow the store past its byte quota.
    #[error("storage quota of {quota} bytes exceeded writing '{key}' ({needed} bytes needed)")]
    QuotaExceeded {
        key: String,
        quota: usize,
        needed: usize,
    },

    /// The backing data could not be decoded or encoded.
    #[error("storage data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Error returned by theme operations that can be refused.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The requested key is not in the preset registry.
    #[error("theme '{key}' is not registered")]
    UnknownTheme { key: String },

    /// A custom preset failed validation.
    #[error("preset '{key}' is invalid: {reason}")]
    InvalidPreset { key: String, reason: String },

    /// An exported configuration could not be decoded.
    #[error("theme configuration could not be read: {0}")]
    Import(String),

    /// The configuration could not be encoded.
    #[error("theme configuration could not be written: {0}")]
    Export(String),
}
