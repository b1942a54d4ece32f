use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that end a run before (or instead of) converting anything.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No supported files found in '{}'", .0.display())]
    NoSupportedFiles(PathBuf),

    #[error("Failed to create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A [`RenderConfig`](crate::config::RenderConfig) value outside the range the layout can use.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("margin_mm {margin_mm} leaves no room on a {width_mm:.0} mm wide page")]
    MarginTooLarge { margin_mm: f32, width_mm: f32 },

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}

/// Per-file conversion errors. These are recorded against a single file and
/// never abort the run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("could not read {kind}: {message}")]
    Parse { kind: &'static str, message: String },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

impl ConvertError {
    pub(crate) fn parse(kind: &'static str, err: impl std::fmt::Display) -> Self {
        ConvertError::Parse {
            kind,
            message: err.to_string(),
        }
    }
}
