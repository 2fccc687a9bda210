//! Error types for stempel-core operations.
//!
//! Registry failures are not fatal: the controller recovers every one of
//! them locally and surfaces a transient display message instead.

use std::path::PathBuf;

/// All errors that can occur in stempel-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    // ─────────────────────────────────────────────────────────────────────
    // Registry Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Registry full: capacity of {capacity} projects reached")]
    CapacityExceeded { capacity: usize },

    #[error("Token already registered: {0}")]
    DuplicateUid(String),

    #[error("No project at index {0}")]
    IndexOutOfBounds(usize),

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {source}")]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;
