//! Error types for scaffolding runs

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scaffolding operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Errors that can occur while preparing or rendering a project.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// An answer has an unsupported shape (e.g. a missing name).
    #[error("invalid answer for '{field}': {reason}")]
    InvalidAnswer {
        /// Answer field name as the user supplies it.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A planned template file is absent from the template store.
    #[error("template file '{path}' not found in template store")]
    TemplateMissing {
        /// Template path relative to the template root.
        path: String,
    },

    /// The template root could not be read.
    #[error("failed to read template source {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root `template.yaml` is missing or malformed.
    #[error("invalid template manifest: {0}")]
    TemplateManifest(String),

    /// A template file exists but cannot be rendered (e.g. a JSON template that is not JSON).
    #[error("template '{path}' is invalid: {reason}")]
    InvalidTemplate { path: String, reason: String },

    /// A zip template bundle could not be read or written.
    #[error("template archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The output location rejected a write.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Task(String),
}

impl ScaffoldError {
    pub(crate) fn invalid_answer(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAnswer {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
