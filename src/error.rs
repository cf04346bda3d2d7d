//! Error types for the analysis crate.
//!
//! Record-level problems (a single malformed result entry, a missing counter
//! in a profile) are absorbed where they occur and never reach this type.
//! What ends up here is fatal for the current invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, deriving, or rendering benchmark data.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Filesystem failure on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON, lacks a `results` array, or a text
    /// artifact could not be understood.
    #[error("failed to parse {origin}: {reason}")]
    Parse { origin: String, reason: String },

    /// Invalid glob pattern used for directory input.
    #[error("invalid file pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    /// A matrix lacks the paired data an explicit request needs.
    #[error("no {what} for matrix `{matrix}`")]
    MissingCounterpart { matrix: String, what: String },

    /// Invalid configuration or roofline constants.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Chart backend failure.
    #[error("failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },

    /// Command-line misuse.
    #[error("{0}")]
    Usage(String),
}

impl AnalysisError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse error for a named input.
    pub fn parse(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::Parse {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Build a missing-counterpart error.
    pub fn missing(matrix: impl Into<String>, what: impl Into<String>) -> Self {
        AnalysisError::MissingCounterpart {
            matrix: matrix.into(),
            what: what.into(),
        }
    }

    /// True for errors caused by how the binary was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, AnalysisError::Usage(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnalysisError>;
