//! Recursive enumeration of the source tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::classify::classify;
use crate::contract::FileEntry;
use crate::error::RunError;

/// Files found under a source root, split by whether a converter exists for them.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// The canonical source root the relative paths are taken from.
    pub root: PathBuf,
    pub supported: Vec<FileEntry>,
    pub unsupported: Vec<PathBuf>,
}

/// Checks that `source_root` is an existing directory and returns its canonical form.
pub fn resolve_source_root(source_root: &Path) -> Result<PathBuf, RunError> {
    if !source_root.exists() {
        return Err(RunError::DirectoryNotFound(source_root.to_path_buf()));
    }
    if !source_root.is_dir() {
        return Err(RunError::NotADirectory(source_root.to_path_buf()));
    }
    fs::canonicalize(source_root)
        .map_err(|_| RunError::DirectoryNotFound(source_root.to_path_buf()))
}

/// Walks `source_root` in file-name order.
///
/// `exclude` (typically the output root) is skipped entirely when it exists and
/// lies inside the source tree, so earlier results are not fed back in.
pub fn scan(source_root: &Path, exclude: Option<&Path>) -> Result<ScanOutcome, RunError> {
    let root = resolve_source_root(source_root)?;
    // Writing in place (output root == source root) excludes nothing.
    let exclude = exclude
        .and_then(|p| fs::canonicalize(p).ok())
        .filter(|excluded| *excluded != root);
    info!(root = %root.display(), "Scanning source directory");

    let mut outcome = ScanOutcome {
        root: root.clone(),
        ..Default::default()
    };

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match &exclude {
            Some(excluded) => entry.path() != excluded.as_path(),
            None => true,
        });

    for entry_res in walker {
        let entry = match entry_res {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(&root) else {
            continue;
        };
        let category = classify(path);
        if category.is_supported() {
            debug!(path = %relative.display(), %category, "Found supported file");
            outcome.supported.push(FileEntry {
                source_path: path.to_path_buf(),
                relative_path: relative.to_path_buf(),
                category,
            });
        } else {
            debug!(path = %relative.display(), "Skipping unsupported file");
            outcome.unsupported.push(relative.to_path_buf());
        }
    }

    info!(
        supported = outcome.supported.len(),
        unsupported = outcome.unsupported.len(),
        "Scan complete"
    );
    Ok(outcome)
}
