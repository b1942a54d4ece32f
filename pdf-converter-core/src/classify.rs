//! Extension-based file classification.

use std::path::Path;

use crate::contract::Category;

/// Extensions per category, lower-case, without the dot.
pub const SUPPORTED_FORMATS: &[(Category, &[&str])] = &[
    (
        Category::Image,
        &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"],
    ),
    (Category::Document, &["docx", "txt", "md", "markdown"]),
    (Category::Spreadsheet, &["xlsx", "xls"]),
    (Category::Presentation, &["pptx"]),
    (Category::Pdf, &["pdf"]),
];

/// Human-readable list of supported formats, one line per category.
pub const SUPPORTED_FORMATS_HELP: &[&str] = &[
    "Images: JPG, PNG, GIF, BMP, TIFF, WebP",
    "Documents: DOCX, TXT, Markdown",
    "Spreadsheets: XLSX, XLS",
    "Presentations: PPTX",
    "PDFs: Existing PDFs will be copied",
];

/// Classifies `path` by its extension, ignoring case.
pub fn classify(path: &Path) -> Category {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Category::Unsupported;
    };
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_FORMATS
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unsupported)
}
