//! Spreadsheets (.xlsx / .xls), read with `calamine`.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::warn;

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::{truncate_chars, TextDocument};

/// One sheet's visible rows, already limited and formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPreview {
    pub name: String,
    pub rows: Vec<String>,
}

pub fn spreadsheet_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let sheets = read_sheets(path, render)?;
    let name = display_name(path);
    let mut doc = TextDocument::new(&name, render);
    let gap = doc.font_size();

    doc.paragraph(&format!("Excel File: {name}"));
    doc.spacer(gap);
    for sheet in &sheets {
        doc.paragraph(&format!("Sheet: {}", sheet.name));
        for row in &sheet.rows {
            doc.paragraph(row);
        }
        doc.spacer(gap);
    }
    Ok(doc.finish())
}

/// Reads at most `max_rows` rows by `max_columns` columns of every sheet.
/// Rows with no values are dropped; each row is cut to `max_line_chars`.
pub fn read_sheets(path: &Path, render: &RenderConfig) -> Result<Vec<SheetPreview>, ConvertError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ConvertError::parse("spreadsheet", e))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                warn!(sheet = %sheet_name, error = %e, "Skipping unreadable sheet");
                continue;
            }
        };
        let rows = range
            .rows()
            .take(render.max_rows)
            .filter_map(|row| format_row(row, render.max_columns))
            .map(|row| truncate_chars(&row, render.max_line_chars))
            .collect();
        sheets.push(SheetPreview {
            name: sheet_name,
            rows,
        });
    }
    Ok(sheets)
}

fn format_row(row: &[Data], max_columns: usize) -> Option<String> {
    let cells: Vec<String> = row
        .iter()
        .take(max_columns)
        .map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    if cells.iter().all(|c| c.trim().is_empty()) {
        return None;
    }
    Some(cells.join(" | "))
}
