//! Console output: header, file listing, per-file progress and the final summary.
//!
//! Everything here goes to stdout; diagnostics go through `tracing` to stderr.

use std::io::Write;
use std::path::Path;

use pdf_converter_core::classify::SUPPORTED_FORMATS_HELP;
use pdf_converter_core::pipeline::{Plan, RunEvent};
use pdf_converter_core::{ConversionJob, FileEntry, RunSummary, StructureMode};

pub fn print_header(job: &ConversionJob, combine: bool) {
    let mode = if combine {
        "combined single PDF"
    } else {
        job.mode.describe()
    };
    println!("PDF Converter");
    println!("Source directory: {}", job.source_root.display());
    println!("Output directory: {}", job.output_root.display());
    println!("Structure mode:   {mode}");
    println!();
}

pub fn print_file_list(plan: &Plan, verbose: bool) {
    println!("Found {} files to convert", plan.conversions.len());
    if verbose {
        for planned in &plan.conversions {
            println!("   - {}", planned.entry.relative_path.display());
        }
        if !plan.skipped_unsupported.is_empty() {
            println!(
                "Skipping {} unsupported files",
                plan.skipped_unsupported.len()
            );
        }
    } else {
        println!("   Use --verbose to see file list");
    }
    println!();
}

pub fn print_supported_formats() {
    println!("Supported formats:");
    for line in SUPPORTED_FORMATS_HELP {
        println!("  - {line}");
    }
}

/// `source -> destination` for every planned file, relative to their roots.
pub fn print_dry_run(plan: &Plan) {
    for planned in &plan.conversions {
        println!(
            "{} -> {}",
            planned.entry.relative_path.display(),
            relative_to(&planned.destination, &plan.job.output_root).display()
        );
    }
    println!();
    println!("Dry run: {} files planned, nothing written", plan.conversions.len());
}

/// Renders pipeline progress events as `[  i/N] Converting: path ok`.
pub struct ProgressPrinter<'a> {
    output_root: &'a Path,
    mode: StructureMode,
    verbose: bool,
}

impl<'a> ProgressPrinter<'a> {
    pub fn new(job: &'a ConversionJob) -> Self {
        Self {
            output_root: &job.output_root,
            mode: job.mode,
            verbose: job.verbose,
        }
    }

    pub fn on_event(&self, event: RunEvent<'_>) {
        match event {
            RunEvent::Started {
                index,
                total,
                planned,
            } => {
                print!(
                    "[{index:3}/{total}] Converting: {} ",
                    planned.entry.relative_path.display()
                );
                let _ = std::io::stdout().flush();
            }
            RunEvent::Finished { result, .. } => match (&result.destination, &result.error) {
                (Some(destination), _) => {
                    let shown = relative_to(destination, self.output_root);
                    match self.mode {
                        StructureMode::Flat => println!("ok -> {}", shown.display()),
                        StructureMode::Structured if self.verbose => {
                            println!("ok");
                            println!("           -> {}", shown.display());
                        }
                        StructureMode::Structured => println!("ok"),
                    }
                }
                (None, Some(error)) if self.verbose => println!("FAILED: {error}"),
                (None, _) => println!("FAILED"),
            },
        }
    }
}

pub fn print_combine_progress(index: usize, total: usize, entry: &FileEntry) {
    println!(
        "[{index:3}/{total}] Adding: {}",
        entry.relative_path.display()
    );
}

pub fn print_summary(job: &ConversionJob, summary: &RunSummary) {
    println!();
    if summary.interrupted {
        println!("Conversion interrupted by user");
    }
    println!("Conversion Summary:");
    println!("   Successful: {}", summary.succeeded());
    println!("   Failed: {}", summary.failed());
    println!("   PDFs saved to: {}", job.output_root.display());
    println!("   Structure: {}", job.mode.describe());

    if job.verbose && summary.failed() > 0 {
        println!();
        println!("Failures:");
        for failure in summary.failures() {
            println!(
                "   - {}: {}",
                failure.relative_path.display(),
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!();
    if summary.is_success() {
        println!("Conversion completed successfully!");
    } else {
        println!("No files were converted successfully");
    }
}

fn relative_to<'p>(path: &'p Path, root: &Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}
