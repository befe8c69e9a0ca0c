//! Directory runs over a mix of readable and broken files.

mod common;

use std::fs;
use std::path::Path;

use common::{Font, PdfBuilder};
use pdfoutline::render::from_json;
use pdfoutline::{process_directory, BatchOptions, HeadingLevel, Outline, OutlineOptions};

fn numbered_pdf() -> Vec<u8> {
    PdfBuilder::new()
        .page()
        .text(Font::Bold, 14.0, 72.0, 720.0, "1. Overview")
        .paragraph(10.0, 690.0, 5)
        .text(Font::Bold, 12.0, 72.0, 600.0, "1.1 Background")
        .paragraph(10.0, 570.0, 5)
        .build()
}

fn populate(dir: &Path) {
    fs::write(dir.join("good.pdf"), numbered_pdf()).unwrap();
    fs::write(dir.join("also.good.pdf"), numbered_pdf()).unwrap();
    fs::write(dir.join("broken.pdf"), b"plain text renamed to pdf").unwrap();
    fs::write(dir.join("readme.txt"), b"not an input").unwrap();
}

fn read_outline(path: &Path) -> Outline {
    from_json(&fs::read_to_string(path).unwrap()).unwrap()
}

fn check_run(parallel: bool) {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    populate(input.path());

    let options = BatchOptions::new()
        .with_parallel(parallel)
        .with_outline_options(OutlineOptions::new().without_ocr());
    let report = process_directory(input.path(), output.path().join("json"), &options).unwrap();

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.succeeded(), 2);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].input.ends_with("broken.pdf"));

    let json_dir = output.path().join("json");
    let good = read_outline(&json_dir.join("good.json"));
    assert_eq!(good.headings.len(), 2);
    assert_eq!(good.headings[0].level, HeadingLevel::H1);
    assert_eq!(read_outline(&json_dir.join("also.good.json")), good);
    assert_eq!(read_outline(&json_dir.join("broken.json")), Outline::empty());
    assert!(!json_dir.join("readme.json").exists());
}

#[test]
fn test_sequential_directory_run() {
    check_run(false);
}

#[test]
fn test_parallel_directory_run() {
    check_run(true);
}
