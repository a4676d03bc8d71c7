use std::path::PathBuf;

use thiserror::Error;

/// Reasons a sales file is rejected.
///
/// The loader wraps lower-level IO and format errors with `anyhow` context;
/// schema and cell problems surface as one of these variants so callers can
/// `downcast_ref::<LoadError>()`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' is empty")]
    EmptyCell { row: usize, column: &'static str },

    #[error("row {row}: column '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}
