use std::fs::{create_dir_all, write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pdf_converter_core::contract::MockConverter;
use pdf_converter_core::pipeline::{convert_directory, execute, prepare, RunEvent};
use pdf_converter_core::{
    ConversionJob, ConvertError, Converter, DefaultConverter, FileEntry, RunError, StructureMode,
};
use tempfile::tempdir;

fn touch(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    create_dir_all(path.parent().unwrap()).unwrap();
    write(path, content).unwrap();
}

#[test]
fn three_convertible_and_one_unsupported_reports_three_successes() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "a.txt", "alpha");
    touch(&src, "notes/b.md", "# beta");
    touch(&src, "notes/deep/c.txt", "gamma");
    touch(&src, "archive.zip", "not convertible");

    let mut converter = MockConverter::new();
    converter.expect_convert().times(3).returning(|_, _| Ok(()));

    let job = ConversionJob::new(&src, None, StructureMode::Structured, false);
    let summary = convert_directory(job, &converter, &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.succeeded(), 3);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.skipped_unsupported, 1);
    assert!(summary
        .results
        .iter()
        .all(|r| !r.relative_path.ends_with("archive.zip")));
    assert!(summary.is_success());
}

#[test]
fn per_file_failure_does_not_stop_the_run() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "1-good.txt", "ok");
    touch(&src, "2-bad.txt", "broken");
    touch(&src, "3-good.txt", "ok");

    let mut converter = MockConverter::new();
    converter
        .expect_convert()
        .times(3)
        .returning(|entry: &FileEntry, _: &Path| {
            if entry.file_name().contains("bad") {
                Err(ConvertError::Pdf("simulated failure".into()))
            } else {
                Ok(())
            }
        });

    let job = ConversionJob::new(&src, None, StructureMode::Flat, true);
    let summary = convert_directory(job, &converter, &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    let failure = summary.failures().next().unwrap();
    assert!(failure.relative_path.ends_with("2-bad.txt"));
    assert!(failure.destination.is_none());
    assert!(failure
        .error
        .as_deref()
        .unwrap()
        .contains("simulated failure"));
}

#[test]
fn all_failures_is_not_a_successful_run() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "only.txt", "x");

    let mut converter = MockConverter::new();
    converter
        .expect_convert()
        .returning(|_, _| Err(ConvertError::Decode("nope".into())));

    let job = ConversionJob::new(&src, None, StructureMode::Structured, false);
    let summary = convert_directory(job, &converter, &AtomicBool::new(false)).unwrap();
    assert_eq!(summary.succeeded(), 0);
    assert!(!summary.is_success());
}

#[test]
fn empty_directory_reports_no_supported_files() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "readme", "no extension");
    touch(&src, "data.bin", "binary");

    let job = ConversionJob::new(&src, None, StructureMode::Structured, false);
    let err = prepare(job).unwrap_err();
    assert!(matches!(err, RunError::NoSupportedFiles(_)));
    assert!(!src.join("pdf").exists(), "no output directory for an empty run");
}

#[test]
fn missing_directory_is_fatal() {
    let tmp = tempdir().unwrap();
    let job = ConversionJob::new(
        tmp.path().join("does-not-exist"),
        None,
        StructureMode::Structured,
        false,
    );
    assert!(matches!(
        prepare(job).unwrap_err(),
        RunError::DirectoryNotFound(_)
    ));
}

#[test]
fn file_instead_of_directory_is_fatal() {
    let tmp = tempdir().unwrap();
    touch(tmp.path(), "file.txt", "x");
    let job = ConversionJob::new(
        tmp.path().join("file.txt"),
        None,
        StructureMode::Structured,
        false,
    );
    assert!(matches!(prepare(job).unwrap_err(), RunError::NotADirectory(_)));
}

#[test]
fn cancel_stops_after_the_file_in_flight() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
        touch(&src, name, name);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let mut converter = MockConverter::new();
    converter.expect_convert().times(2).returning(move |entry, _| {
        if entry.file_name() == "b.txt" {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(())
    });

    let job = ConversionJob::new(&src, None, StructureMode::Structured, false);
    let summary = convert_directory(job, &converter, &cancel).unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.succeeded(), 2);
}

struct CancelAfterFirst {
    inner: DefaultConverter,
    cancel: Arc<AtomicBool>,
}

impl Converter for CancelAfterFirst {
    fn convert(&self, entry: &FileEntry, destination: &Path) -> Result<(), ConvertError> {
        let result = self.inner.convert(entry, destination);
        self.cancel.store(true, Ordering::SeqCst);
        result
    }
}

#[test]
fn interrupted_run_leaves_written_pdfs_intact() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "first.txt", "written before the interrupt");
    touch(&src, "second.txt", "never reached");

    let cancel = Arc::new(AtomicBool::new(false));
    let converter = CancelAfterFirst {
        inner: DefaultConverter::default(),
        cancel: Arc::clone(&cancel),
    };
    let job = ConversionJob::new(&src, None, StructureMode::Structured, false);
    let summary = convert_directory(job, &converter, &cancel).unwrap();

    assert!(summary.interrupted);
    let first = std::fs::read(src.join("pdf/first.pdf")).unwrap();
    assert!(first.starts_with(b"%PDF"));
    assert!(!src.join("pdf/second.pdf").exists());
    let leftovers: Vec<_> = std::fs::read_dir(src.join("pdf"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "no temporary files left behind: {leftovers:?}");
}

#[test]
fn default_output_directory_is_not_rescanned() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "doc.txt", "hello");
    let converter = DefaultConverter::default();

    let first = convert_directory(
        ConversionJob::new(&src, None, StructureMode::Structured, false),
        &converter,
        &AtomicBool::new(false),
    )
    .unwrap();
    assert_eq!(first.succeeded(), 1);

    // second run must not pick up pdf/doc.pdf as a new source
    let plan = prepare(ConversionJob::new(&src, None, StructureMode::Structured, false)).unwrap();
    assert_eq!(plan.conversions.len(), 1);
    assert!(plan.conversions[0].entry.relative_path.ends_with("doc.txt"));
}

#[test]
fn output_root_equal_to_source_converts_in_place() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "a.txt", "alpha");
    touch(&src, "nested/b.txt", "beta");

    let plan = prepare(ConversionJob::new(
        &src,
        Some(src.clone()),
        StructureMode::Flat,
        false,
    ))
    .unwrap();
    assert_eq!(plan.conversions.len(), 2);

    let summary = execute(&plan, &DefaultConverter::default(), &AtomicBool::new(false), |_| {})
        .unwrap();
    assert_eq!(summary.succeeded(), 2);
    assert!(src.join("a.pdf").is_file());
    assert!(src.join("nested_b.pdf").is_file());
}

#[test]
fn events_are_emitted_in_order_with_totals() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src, "a.txt", "a");
    touch(&src, "b.txt", "b");

    let mut converter = MockConverter::new();
    converter.expect_convert().returning(|_, _| Ok(()));

    let plan = prepare(ConversionJob::new(&src, None, StructureMode::Flat, false)).unwrap();
    let mut seen = Vec::new();
    execute(&plan, &converter, &AtomicBool::new(false), |event| match event {
        RunEvent::Started { index, total, .. } => seen.push(format!("start {index}/{total}")),
        RunEvent::Finished { index, total, .. } => seen.push(format!("done {index}/{total}")),
    })
    .unwrap();
    assert_eq!(seen, vec!["start 1/2", "done 1/2", "start 2/2", "done 2/2"]);
}
