//! Error types for report generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The artifact directory is missing, not a directory, or cannot be listed.
    #[error("cannot access artifact directory {}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matched artifact file could not be read after it was listed.
    #[error("failed to read artifact {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact id that cannot produce a valid match pattern.
    #[error("invalid match pattern for artifact '{id}': {reason}")]
    Pattern { id: String, reason: String },

    /// The report (or a scaffolded file) could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
