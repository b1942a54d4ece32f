//! Output path policy for structured and flat modes.
//!
//! Every destination is decided up front, before any file is written, so
//! uniqueness within a run never depends on what happens to exist on disk.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::contract::{FileEntry, PlannedConversion, StructureMode};

const PDF_EXTENSION: &str = "pdf";

/// Hands out unique destination paths under one output root.
#[derive(Debug)]
pub struct OutputPlanner {
    output_root: PathBuf,
    mode: StructureMode,
    claimed: HashSet<String>,
}

impl OutputPlanner {
    pub fn new(output_root: impl Into<PathBuf>, mode: StructureMode) -> Self {
        Self {
            output_root: output_root.into(),
            mode,
            claimed: HashSet::new(),
        }
    }

    /// Destination for `relative` (a path relative to the source root).
    ///
    /// When the natural destination is already taken in this run, `_1`, `_2`, …
    /// is appended to the stem until a free name is found. Claims compare
    /// case-insensitively.
    pub fn plan(&mut self, relative: &Path) -> PathBuf {
        let (dir, stem) = match self.mode {
            StructureMode::Structured => (
                self.output_root.join(parent_dir(relative)),
                file_stem(relative),
            ),
            StructureMode::Flat => (self.output_root.clone(), flat_stem(relative)),
        };

        let mut candidate = dir.join(format!("{stem}.{PDF_EXTENSION}"));
        let mut counter = 1;
        while !self.claimed.insert(claim_key(&candidate)) {
            candidate = dir.join(format!("{stem}_{counter}.{PDF_EXTENSION}"));
            counter += 1;
        }
        if counter > 1 {
            debug!(
                relative = %relative.display(),
                destination = %candidate.display(),
                "Destination name was taken, disambiguated"
            );
        }
        candidate
    }
}

/// Plans destinations for `entries` in order.
pub fn plan_all(
    entries: Vec<FileEntry>,
    output_root: &Path,
    mode: StructureMode,
) -> Vec<PlannedConversion> {
    let mut planner = OutputPlanner::new(output_root, mode);
    entries
        .into_iter()
        .map(|entry| {
            let destination = planner.plan(&entry.relative_path);
            PlannedConversion { entry, destination }
        })
        .collect()
}

/// `sub/dir/notes.txt` → `sub_dir_notes`.
pub fn flat_stem(relative: &Path) -> String {
    let mut parts: Vec<String> = normal_components(&parent_dir(relative));
    parts.push(file_stem(relative));
    parts.join("_")
}

fn file_stem(relative: &Path) -> String {
    relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}

fn parent_dir(relative: &Path) -> PathBuf {
    relative
        .parent()
        .map(|p| normal_components(p).iter().collect())
        .unwrap_or_default()
}

// Drops `.`, `..`, roots and prefixes so a destination can never escape the output root.
fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn claim_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
