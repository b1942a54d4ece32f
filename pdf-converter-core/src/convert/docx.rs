//! Word documents, read with `docx-rs`.

use std::fs;
use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::TextDocument;

pub fn docx_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let paragraphs = read_paragraphs(path)?;
    let name = display_name(path);
    let mut doc = TextDocument::new(&name, render);
    let gap = doc.font_size();
    for paragraph in paragraphs.iter().filter(|p| !p.trim().is_empty()) {
        doc.paragraph(paragraph);
        doc.spacer(gap);
    }
    if !doc.has_content() {
        doc.paragraph(&format!("Converted from: {name}"));
        doc.paragraph("No readable content found");
    }
    Ok(doc.finish())
}

/// Text of every body paragraph; table rows come out as one line with cells joined by ` | `.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>, ConvertError> {
    let bytes = fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ConvertError::parse("DOCX", e))?;
    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => {
                let mut text = String::new();
                paragraph_text(&para.children, &mut text);
                paragraphs.push(text);
            }
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    let TableChild::TableRow(tr) = row;
                    let mut cells = Vec::new();
                    for cell in &tr.cells {
                        let TableRowChild::TableCell(tc) = cell;
                        let mut text = String::new();
                        for content in &tc.children {
                            if let TableCellContent::Paragraph(para) = content {
                                paragraph_text(&para.children, &mut text);
                            }
                        }
                        cells.push(text);
                    }
                    paragraphs.push(cells.join(" | "));
                }
            }
            _ => {}
        }
    }
    Ok(paragraphs)
}

fn paragraph_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(text) = run_child {
                        out.push_str(&text.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => paragraph_text(&link.children, out),
            _ => {}
        }
    }
}
