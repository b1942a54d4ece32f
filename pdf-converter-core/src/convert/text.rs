//! Plain text files.

use std::fs;
use std::path::Path;

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::TextDocument;

/// Renders each non-blank line as a wrapped paragraph; blank lines become space.
pub fn text_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let content = fs::read_to_string(path)?;
    let name = display_name(path);
    let mut doc = TextDocument::new(&name, render);
    render_text(&content, &mut doc);
    if !doc.has_content() {
        doc.paragraph(&format!("Converted from: {name}"));
    }
    Ok(doc.finish())
}

pub(crate) fn render_text(content: &str, doc: &mut TextDocument) {
    let gap = doc.font_size();
    for line in content.lines() {
        if line.trim().is_empty() {
            doc.spacer(gap);
        } else {
            doc.paragraph(line);
        }
    }
}
