//! High-level pipeline: validate → scan → plan names → convert → summarise.
//!
//! # Major Types
//! - [`Plan`]: the scanned and named work for one [`ConversionJob`]
//! - [`RunEvent`]: progress notifications handed to the caller while converting
//!
//! # Error Handling
//! Problems with the job as a whole (missing source directory, nothing to
//! convert, output root not creatable) are returned as [`RunError`]. A failure
//! converting one file is recorded in the [`RunSummary`] and the run moves on
//! to the next file.
//!
//! # Cancellation
//! The caller passes an [`AtomicBool`]; once set, no further file is started.
//! The file in flight always completes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::contract::{ConversionJob, ConversionResult, Converter, PlannedConversion, RunSummary};
use crate::error::{ConvertError, RunError};
use crate::naming::plan_all;
use crate::scan::scan;

/// Scanned and named work for one job.
#[derive(Debug, Clone)]
pub struct Plan {
    pub job: ConversionJob,
    /// Canonical source root.
    pub source_root: PathBuf,
    pub conversions: Vec<PlannedConversion>,
    pub skipped_unsupported: Vec<PathBuf>,
}

/// Progress notifications emitted by [`execute`].
#[derive(Debug)]
pub enum RunEvent<'a> {
    Started {
        index: usize,
        total: usize,
        planned: &'a PlannedConversion,
    },
    Finished {
        index: usize,
        total: usize,
        result: &'a ConversionResult,
    },
}

/// Validates the source root, enumerates it and assigns every supported file a destination.
pub fn prepare(job: ConversionJob) -> Result<Plan, RunError> {
    info!(
        source = %job.source_root.display(),
        output = %job.output_root.display(),
        mode = job.mode.describe(),
        "Preparing conversion plan"
    );
    let outcome = scan(&job.source_root, Some(&job.output_root))?;
    if outcome.supported.is_empty() {
        warn!(source = %outcome.root.display(), "No supported files found");
        return Err(RunError::NoSupportedFiles(job.source_root.clone()));
    }
    let conversions = plan_all(outcome.supported, &job.output_root, job.mode);
    info!(files = conversions.len(), "Conversion plan ready");
    Ok(Plan {
        job,
        source_root: outcome.root,
        conversions,
        skipped_unsupported: outcome.unsupported,
    })
}

/// Creates the output root (and parents) if needed.
pub fn ensure_output_root(output_root: &Path) -> Result<(), RunError> {
    fs::create_dir_all(output_root).map_err(|source| {
        error!(path = %output_root.display(), error = ?source, "Failed to create output directory");
        RunError::OutputDir {
            path: output_root.to_path_buf(),
            source,
        }
    })
}

/// Converts every planned file in order with `converter`.
pub fn execute<C, F>(
    plan: &Plan,
    converter: &C,
    cancel: &AtomicBool,
    mut on_event: F,
) -> Result<RunSummary, RunError>
where
    C: Converter + ?Sized,
    F: FnMut(RunEvent<'_>),
{
    ensure_output_root(&plan.job.output_root)?;

    let total = plan.conversions.len();
    let mut summary = RunSummary {
        skipped_unsupported: plan.skipped_unsupported.len(),
        ..Default::default()
    };

    for (i, planned) in plan.conversions.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            warn!(done = i, total, "Run interrupted, stopping before next file");
            summary.interrupted = true;
            break;
        }
        let index = i + 1;
        on_event(RunEvent::Started {
            index,
            total,
            planned,
        });

        let result = match convert_one(planned, converter) {
            Ok(()) => ConversionResult::success(planned),
            Err(e) => {
                error!(
                    source = %planned.entry.relative_path.display(),
                    error = %e,
                    "File conversion failed"
                );
                ConversionResult::failure(planned, &e)
            }
        };
        on_event(RunEvent::Finished {
            index,
            total,
            result: &result,
        });
        summary.results.push(result);
    }

    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        skipped = summary.skipped_unsupported,
        interrupted = summary.interrupted,
        "Run finished"
    );
    Ok(summary)
}

/// [`prepare`] followed by [`execute`] without progress reporting.
pub fn convert_directory<C>(
    job: ConversionJob,
    converter: &C,
    cancel: &AtomicBool,
) -> Result<RunSummary, RunError>
where
    C: Converter + ?Sized,
{
    let plan = prepare(job)?;
    execute(&plan, converter, cancel, |_| {})
}

fn convert_one<C>(planned: &PlannedConversion, converter: &C) -> Result<(), ConvertError>
where
    C: Converter + ?Sized,
{
    if let Some(parent) = planned.destination.parent() {
        fs::create_dir_all(parent)?;
    }
    converter.convert(&planned.entry, &planned.destination)
}
