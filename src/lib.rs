//! # pdfoutline
//!
//! Extracts a document outline (title plus H1/H2/H3 headings with page
//! numbers) from PDF files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline_file("document.pdf")?;
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - **Line extraction**: the PDF text layer is decoded with lopdf into
//!   positioned lines carrying font size and weight. Scanned documents can
//!   fall back to OCR (feature `ocr`).
//! - **Font profile**: the body-text size of each document is its
//!   character-weighted most common font size.
//! - **Scoring**: every line gets a heading score from relative size,
//!   weight, numbering, length, capitalization and punctuation.
//! - **Classification**: score thresholds are derived per document; the
//!   strongest first-page line becomes the title, the rest fall into H1-H3.

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use analysis::{ClassifierSettings, OutlineAnalyzer, ScoringWeights};
pub use batch::{process_directory, BatchOptions, BatchReport};
pub use error::{Error, Result};
pub use extract::{LineExtractor, NativeExtractor};
pub use model::{BoundingBox, Heading, HeadingLevel, Outline, TextLine};
pub use pipeline::{DocumentLines, ErrorMode, OcrConfig, OcrPolicy, OutlineOptions, OutlinePipeline};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_file;
///
/// let outline = extract_outline_file("document.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.headings.len());
/// ```
pub fn extract_outline_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_file_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().strict().without_ocr();
/// let outline = extract_outline_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn extract_outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<Outline> {
    let data = std::fs::read(path)?;
    extract_outline_bytes_with_options(&data, options)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_bytes(data: &[u8]) -> Result<Outline> {
    extract_outline_bytes_with_options(data, &OutlineOptions::default())
}

/// Extract the outline of a PDF held in memory with custom options.
pub fn extract_outline_bytes_with_options(data: &[u8], options: &OutlineOptions) -> Result<Outline> {
    let native = NativeExtractor::from_bytes(data)?;
    OutlinePipeline::new(options).run(&native, || ocr_fallback(data, options))
}

/// Extract the outline of a PDF read from `reader`.
pub fn extract_outline_reader<R: Read>(reader: R) -> Result<Outline> {
    extract_outline_reader_with_options(reader, &OutlineOptions::default())
}

/// Extract the outline of a PDF read from `reader` with custom options.
pub fn extract_outline_reader_with_options<R: Read>(
    mut reader: R,
    options: &OutlineOptions,
) -> Result<Outline> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    extract_outline_bytes_with_options(&data, options)
}

/// Extract the positioned lines of a PDF file without classifying them.
pub fn extract_lines_file<P: AsRef<Path>>(path: P, options: &OutlineOptions) -> Result<DocumentLines> {
    let data = std::fs::read(path)?;
    let native = NativeExtractor::from_bytes(&data)?;
    OutlinePipeline::new(options).collect_lines(&native, || ocr_fallback(&data, options))
}

/// Build an outline from already extracted lines with default settings.
///
/// Lines may come from any source and in any order.
pub fn outline_from_lines(lines: &[TextLine]) -> Outline {
    OutlineAnalyzer::default().outline(lines)
}

/// Build an outline from already extracted lines.
pub fn outline_from_lines_with_options(lines: &[TextLine], options: &OutlineOptions) -> Outline {
    options.analyzer().outline(lines)
}

#[cfg(feature = "ocr")]
fn ocr_fallback(data: &[u8], options: &OutlineOptions) -> Option<Box<dyn LineExtractor>> {
    match extract::OcrExtractor::from_bytes(data.to_vec(), options.ocr.clone()) {
        Ok(ocr) => Some(Box::new(ocr)),
        Err(e) => {
            log::warn!("OCR unavailable: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn ocr_fallback(_data: &[u8], _options: &OutlineOptions) -> Option<Box<dyn LineExtractor>> {
    log::warn!("Built without the `ocr` feature; pages without a text layer stay empty");
    None
}
