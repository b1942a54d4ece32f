//! Combine mode: every supported file merged into one PDF.
//!
//! Each file gets a title with its relative path. Text-like formats are
//! inlined, images are embedded, and the remaining formats are listed with
//! their size. A read error for one file is written into the document in
//! place of its content.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::contract::{Category, FileEntry};
use crate::convert::{display_name, docx, markdown, text, write_atomically};
use crate::error::ConvertError;
use crate::layout::{Font, TextDocument};
use crate::pipeline::Plan;

const FILES_PER_PAGE_GROUP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineOutcome {
    Written { destination: PathBuf, files: usize },
    Interrupted { files_added: usize },
}

/// `<source dir name>_combined.pdf` inside the output root.
pub fn combined_destination(plan: &Plan) -> PathBuf {
    let stem = plan
        .source_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "directory".to_string());
    plan.job.output_root.join(format!("{stem}_combined.pdf"))
}

/// Builds the combined PDF for `plan`. `on_file` is called before each file is added.
///
/// When `cancel` is set between files nothing is written.
pub fn combine_files<F>(
    plan: &Plan,
    cancel: &AtomicBool,
    mut on_file: F,
) -> Result<CombineOutcome, ConvertError>
where
    F: FnMut(usize, usize, &FileEntry),
{
    let destination = combined_destination(plan);
    let total = plan.conversions.len();
    info!(destination = %destination.display(), files = total, "Creating combined PDF");
    fs::create_dir_all(&plan.job.output_root)?;

    let mut doc = TextDocument::new(&display_name(&destination), &plan.job.render);
    for (i, planned) in plan.conversions.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            warn!(files_added = i, "Combine interrupted, combined PDF not written");
            return Ok(CombineOutcome::Interrupted { files_added: i });
        }
        let index = i + 1;
        let entry = &planned.entry;
        on_file(index, total, entry);

        doc.heading(&entry.relative_path.display().to_string(), 1);
        if let Err(e) = append_entry(&mut doc, entry) {
            warn!(
                file = %entry.relative_path.display(),
                error = %e,
                "Could not include file content"
            );
            doc.styled(
                &format!("Error processing {}: {e}", entry.file_name()),
                Font::Italic,
                0.0,
            );
        }

        let gap = doc.font_size();
        doc.spacer(gap);
        doc.paragraph(&"-".repeat(50));
        doc.spacer(gap);
        if index % FILES_PER_PAGE_GROUP == 0 && index < total {
            doc.page_break();
        }
    }

    write_atomically(&destination, &doc.finish())?;
    info!(destination = %destination.display(), "Combined PDF written");
    Ok(CombineOutcome::Written {
        destination,
        files: total,
    })
}

fn append_entry(doc: &mut TextDocument, entry: &FileEntry) -> Result<(), ConvertError> {
    let path = entry.source_path.as_path();
    match entry.category {
        Category::Image => {
            doc.styled(&format!("Image file: {}", entry.file_name()), Font::Italic, 0.0);
            doc.styled(&format!("Size: {} bytes", file_size(path)?), Font::Italic, 0.0);
            match image::open(path) {
                Ok(decoded) => {
                    doc.spacer(doc.font_size() * 0.5);
                    doc.image(&decoded);
                }
                Err(e) => doc.styled(&format!("Could not embed image: {e}"), Font::Italic, 0.0),
            }
        }
        Category::Document => match entry.extension().as_str() {
            "md" | "markdown" => markdown::render_markdown(&fs::read_to_string(path)?, doc),
            "docx" => {
                for paragraph in docx::read_paragraphs(path)? {
                    if paragraph.trim().is_empty() {
                        doc.spacer(doc.font_size() * 0.5);
                    } else {
                        doc.paragraph(&paragraph);
                    }
                }
            }
            _ => text::render_text(&fs::read_to_string(path)?, doc),
        },
        Category::Spreadsheet | Category::Presentation | Category::Pdf => {
            let kind = match entry.category {
                Category::Spreadsheet => "Spreadsheet",
                Category::Presentation => "Presentation",
                _ => "Existing PDF",
            };
            doc.styled(&format!("{kind} file: {}", entry.file_name()), Font::Italic, 0.0);
            doc.styled(&format!("Size: {} bytes", file_size(path)?), Font::Italic, 0.0);
            doc.styled(
                "Note: content is not embedded in the combined PDF",
                Font::Italic,
                0.0,
            );
        }
        Category::Unsupported => return Err(ConvertError::Unsupported(entry.file_name())),
    }
    Ok(())
}

fn file_size(path: &Path) -> Result<u64, ConvertError> {
    Ok(fs::metadata(path)?.len())
}
