//! Custom error types for ipcmeter.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.
//!
//! Sync and teardown failures are deliberately not represented here: they
//! are warnings surfaced through `tracing` and never abort a cycle.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures inside one backend cycle.
/// Each variant aborts the in-progress cycle after partial resources
/// have been released.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to open backing resource {id}: {source}")]
    Resource {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to size {id} to {size} bytes: {source}")]
    Sizing {
        id: String,
        size: usize,
        #[source]
        source: io::Error,
    },

    #[error("Failed to map {id}: {source}")]
    Mapping {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("Transfer ({op}) failed on {id}: {source}")]
    Transfer {
        id: String,
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Configuration errors - fail-fast on invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
