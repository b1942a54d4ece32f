///
/// This module implements the CLI interface for pdf-converter: argument
/// parsing, the async entrypoint, interrupt handling and mapping of results to
/// a [`RunStatus`].
///
/// All conversion logic (scanning, naming, converters, pipeline) lives in the
/// [`pdf-converter-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: run the `pdf-converter` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`pdf-converter-core`]: ../../pdf-converter-core/
use crate::load_config::load_render_config;
use crate::report;
use anyhow::{Context, Result};
use clap::Parser;
use pdf_converter_core::combine::{combine_files, CombineOutcome};
use pdf_converter_core::pipeline::{execute, prepare};
use pdf_converter_core::{ConversionJob, DefaultConverter, RunError, StructureMode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const EXAMPLES: &str = "\
Examples:
  pdf-converter /path/to/documents
  pdf-converter /path/to/documents --flat
  pdf-converter /path/to/documents --output /path/to/pdfs
  pdf-converter /path/to/documents --flat --verbose
  pdf-converter /path/to/documents --combine
  pdf-converter . --output ../converted_pdfs

Supported file formats:
  Images: JPG, PNG, GIF, BMP, TIFF, WebP
  Documents: DOCX, TXT, Markdown
  Spreadsheets: XLSX, XLS
  Presentations: PPTX
  PDFs: Existing PDFs will be copied";

/// Convert every supported file in a directory tree to PDF.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pdf-converter",
    version,
    about = "Convert files in a directory and its subdirectories to PDF",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Directory containing files to convert
    pub directory: PathBuf,

    /// Put all PDFs in one folder instead of mirroring the directory structure
    #[clap(long)]
    pub flat: bool,

    /// Output directory for PDFs (default: a 'pdf' folder inside the source directory)
    #[clap(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Show the file list, destinations and failure details
    #[clap(short, long)]
    pub verbose: bool,

    /// Combine all files into a single PDF with file titles
    #[clap(short, long)]
    pub combine: bool,

    /// Print the planned destinations without converting anything
    #[clap(long)]
    pub dry_run: bool,

    /// YAML file overriding rendering limits (env: PDF_CONVERTER_CONFIG)
    #[clap(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// How a run that did not hit a fatal error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// At least one file was converted (or the plan was printed).
    Converted,
    /// Every attempted file failed.
    NothingConverted,
    /// Stopped by Ctrl-C after the file in flight.
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Converted => 0,
            RunStatus::NothingConverted | RunStatus::Interrupted => 1,
        }
    }
}

impl Cli {
    fn job(&self) -> Result<ConversionJob> {
        let render = load_render_config(self.config.clone())?;
        let mode = if self.flat {
            StructureMode::Flat
        } else {
            StructureMode::Structured
        };
        Ok(
            ConversionJob::new(&self.directory, self.output.clone(), mode, self.verbose)
                .with_render(render),
        )
    }
}

/// Async CLI entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<RunStatus> {
    tracing::info!(directory = %cli.directory.display(), "pdf-converter run starting");

    let cancel = Arc::new(AtomicBool::new(false));
    let watcher = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing current file");
                cancel.store(true, Ordering::SeqCst);
            }
        })
    };

    let result = tokio::task::spawn_blocking(move || run_blocking(&cli, &cancel))
        .await
        .context("conversion task failed")?;
    watcher.abort();

    match &result {
        Ok(status) => tracing::info!(?status, "pdf-converter run finished"),
        Err(e) => tracing::error!(error = %e, "pdf-converter run failed"),
    }
    result
}

/// The synchronous body of [`run`]; `cancel` is polled between files.
pub fn run_blocking(cli: &Cli, cancel: &AtomicBool) -> Result<RunStatus> {
    let job = cli.job()?;
    report::print_header(&job, cli.combine);

    let plan = match prepare(job) {
        Ok(plan) => plan,
        Err(e @ RunError::NoSupportedFiles(_)) => {
            report::print_supported_formats();
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    report::print_file_list(&plan, cli.verbose);

    if cli.dry_run {
        report::print_dry_run(&plan);
        return Ok(RunStatus::Converted);
    }

    if cli.combine {
        let outcome = combine_files(&plan, cancel, report::print_combine_progress)
            .context("Failed to create combined PDF")?;
        return Ok(match outcome {
            CombineOutcome::Written { destination, files } => {
                println!();
                println!("Combined PDF created with {files} files");
                println!("Combined PDF saved to: {}", destination.display());
                RunStatus::Converted
            }
            CombineOutcome::Interrupted { .. } => {
                println!();
                println!("Conversion interrupted by user");
                RunStatus::Interrupted
            }
        });
    }

    let converter = DefaultConverter::new(plan.job.render.clone());
    let printer = report::ProgressPrinter::new(&plan.job);
    let summary = execute(&plan, &converter, cancel, |event| printer.on_event(event))?;
    report::print_summary(&plan.job, &summary);

    Ok(if summary.interrupted {
        RunStatus::Interrupted
    } else if summary.is_success() {
        RunStatus::Converted
    } else {
        RunStatus::NothingConverted
    })
}
