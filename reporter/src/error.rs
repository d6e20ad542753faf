//! Error types for the weekboard reporter.
//!
//! This module defines the crate-level error type unifying the per-module
//! errors, providing structured error handling with clear, human-readable
//! messages.

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::writer::WriterError;

/// Errors that can occur during a report run.
///
/// This is the primary error type for the reporter crate, encompassing all
/// possible failure modes.
#[derive(Error, Debug)]
pub enum ReporterError {
    /// Configuration-related error. Fatal: reported before any network call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API client error.
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Report serialization error.
    #[error("report error: {0}")]
    Writer(#[from] WriterError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for reporter operations.
pub type Result<T> = std::result::Result<T, ReporterError>;
