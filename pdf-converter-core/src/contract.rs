//! # contract: data model and the converter seam
//!
//! Plain data types shared by the scanner, the naming policy, the pipeline and
//! the CLI, plus the [`Converter`] trait every format backend implements.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so pipeline behaviour can be tested
//!   without producing real PDFs.

use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::config::RenderConfig;
use crate::error::ConvertError;

/// Classification of a file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Image,
    Document,
    Spreadsheet,
    Presentation,
    Pdf,
    Unsupported,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Document => "document",
            Category::Spreadsheet => "spreadsheet",
            Category::Presentation => "presentation",
            Category::Pdf => "pdf",
            Category::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Category::Unsupported)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How destination paths are laid out under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructureMode {
    /// Mirror the source directory hierarchy.
    #[default]
    Structured,
    /// Put every PDF directly in the output root, directories folded into the name.
    Flat,
}

impl StructureMode {
    pub fn describe(&self) -> &'static str {
        match self {
            StructureMode::Structured => "directory structure",
            StructureMode::Flat => "flat list",
        }
    }
}

/// Everything a single invocation needs. Built once, never mutated during a run.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub mode: StructureMode,
    pub verbose: bool,
    pub render: RenderConfig,
}

impl ConversionJob {
    /// Output defaults to `<source>/pdf` when no override is given.
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_root: Option<PathBuf>,
        mode: StructureMode,
        verbose: bool,
    ) -> Self {
        let source_root = source_root.into();
        let output_root = output_root.unwrap_or_else(|| source_root.join("pdf"));
        Self {
            source_root,
            output_root,
            mode,
            verbose,
            render: RenderConfig::default(),
        }
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

/// A file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub category: Category,
}

impl FileEntry {
    /// Lower-cased extension without the dot, empty when there is none.
    pub fn extension(&self) -> String {
        self.source_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A supported file together with the destination the naming policy assigned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedConversion {
    pub entry: FileEntry,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    Failure,
}

/// Outcome of one planned conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub destination: Option<PathBuf>,
    pub status: ConversionStatus,
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn success(planned: &PlannedConversion) -> Self {
        Self {
            source_path: planned.entry.source_path.clone(),
            relative_path: planned.entry.relative_path.clone(),
            destination: Some(planned.destination.clone()),
            status: ConversionStatus::Success,
            error: None,
        }
    }

    pub fn failure(planned: &PlannedConversion, error: &ConvertError) -> Self {
        Self {
            source_path: planned.entry.source_path.clone(),
            relative_path: planned.entry.relative_path.clone(),
            destination: None,
            status: ConversionStatus::Failure,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }
}

/// Aggregated results of a run, used for reporting only.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<ConversionResult>,
    pub skipped_unsupported: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConversionResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// A run counts as successful once at least one file was converted.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }
}

/// Produces a PDF at `destination` from the file described by `entry`.
///
/// Implementations must either leave a complete PDF at `destination` or return
/// an error with a human-readable message; they must not touch other files.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Converter: Send + Sync {
    fn convert(&self, entry: &FileEntry, destination: &Path) -> Result<(), ConvertError>;
}
