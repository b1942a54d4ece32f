//! Per-format converters and the default dispatcher.
//!
//! Each backend turns a source file into PDF bytes; [`DefaultConverter`] picks
//! the backend from the entry's category (and extension, for documents) and
//! writes the result next to its destination through a temporary file, so a
//! failed or interrupted conversion never leaves a truncated PDF behind.

pub mod docx;
pub mod markdown;
pub mod pdf;
pub mod presentation;
pub mod raster;
pub mod spreadsheet;
pub mod text;

use std::io::Write;
use std::path::Path;

use tracing::{debug, error};

use crate::config::RenderConfig;
use crate::contract::{Category, Converter, FileEntry};
use crate::error::ConvertError;

/// Converter backed by the crates in this module.
#[derive(Debug, Clone, Default)]
pub struct DefaultConverter {
    render: RenderConfig,
}

impl DefaultConverter {
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Renders `entry` to PDF bytes without touching the filesystem beyond reading the source.
    pub fn render(&self, entry: &FileEntry) -> Result<Vec<u8>, ConvertError> {
        let path = entry.source_path.as_path();
        match entry.category {
            Category::Image => raster::image_to_pdf(path, &self.render),
            Category::Document => match entry.extension().as_str() {
                "docx" => docx::docx_to_pdf(path, &self.render),
                "md" | "markdown" => markdown::markdown_to_pdf(path, &self.render),
                "txt" => text::text_to_pdf(path, &self.render),
                other => Err(ConvertError::Unsupported(format!("document type .{other}"))),
            },
            Category::Spreadsheet => spreadsheet::spreadsheet_to_pdf(path, &self.render),
            Category::Presentation => presentation::presentation_to_pdf(path, &self.render),
            Category::Pdf => pdf::read_pdf(path),
            Category::Unsupported => Err(ConvertError::Unsupported(entry.file_name())),
        }
    }
}

impl Converter for DefaultConverter {
    fn convert(&self, entry: &FileEntry, destination: &Path) -> Result<(), ConvertError> {
        debug!(
            source = %entry.source_path.display(),
            destination = %destination.display(),
            category = %entry.category,
            "Converting file"
        );
        let bytes = self.render(entry).map_err(|e| {
            error!(source = %entry.source_path.display(), error = ?e, "Conversion failed");
            e
        })?;
        write_atomically(destination, &bytes).map_err(|e| {
            error!(destination = %destination.display(), error = ?e, "Failed to write PDF");
            e
        })
    }
}

/// Writes `bytes` to a temporary file beside `destination`, then renames it into place.
pub fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(destination).map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
