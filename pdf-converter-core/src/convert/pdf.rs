//! Existing PDFs are passed through unchanged.

use std::fs;
use std::path::Path;

use crate::error::ConvertError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Reads `path` and checks it carries the PDF header.
pub fn read_pdf(path: &Path) -> Result<Vec<u8>, ConvertError> {
    let bytes = fs::read(path)?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ConvertError::parse("PDF", "missing %PDF header"));
    }
    Ok(bytes)
}
