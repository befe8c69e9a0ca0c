//! Directory processing: one JSON outline per PDF.
//!
//! Files are independent. A file that cannot be processed still gets an
//! output file holding the empty outline, and the run continues.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::Outline;
use crate::pipeline::OutlineOptions;
use crate::render::{write_json, JsonFormat};

/// Options for processing a directory.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Process files in parallel
    pub parallel: bool,
    /// JSON output format
    pub format: JsonFormat,
    /// Options applied to every document
    pub outline: OutlineOptions,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set per-document outline options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline = options;
        self
    }
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of headings written (title excluded)
    pub headings: usize,
    /// Why the file yielded the empty outline, if it failed
    pub error: Option<Error>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a directory run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_ok())
    }
}

/// PDF files directly inside `dir`, sorted by name.
pub fn list_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for `input`: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// Process every PDF in `input_dir`, writing outlines to `output_dir`.
pub fn process_directory<P, Q>(input_dir: P, output_dir: Q, options: &BatchOptions) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_directory_with_progress(input_dir, output_dir, options, |_| {})
}

/// Like [`process_directory`], calling `on_file` as each file completes.
pub fn process_directory_with_progress<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&FileReport) + Sync,
{
    let output_dir = output_dir.as_ref();
    let inputs = list_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!(
        "Processing {} PDF files into {}",
        inputs.len(),
        output_dir.display()
    );

    let run = |input: &PathBuf| {
        let report = process_file(input, output_dir, options);
        on_file(&report);
        report
    };
    let files: Vec<FileReport> = if options.parallel {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    };

    Ok(BatchReport { files })
}

/// Process one file, always leaving an output file behind.
pub fn process_file(input: &Path, output_dir: &Path, options: &BatchOptions) -> FileReport {
    let output = output_path(input, output_dir);

    let (outline, mut error) = match crate::extract_outline_file_with_options(input, &options.outline) {
        Ok(outline) => (outline, None),
        Err(e) => {
            log::warn!("{}: {}", input.display(), e);
            (Outline::empty(), Some(e))
        }
    };

    if let Err(e) = write_json(&outline, &output, options.format) {
        log::warn!("Failed to write {}: {}", output.display(), e);
        error.get_or_insert(e);
    }

    FileReport {
        input: input.to_path_buf(),
        output,
        headings: outline.headings.len(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("/in/report.final.pdf"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/report.final.json"));
    }

    #[test]
    fn test_list_pdfs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let files = list_pdfs(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_malformed_file_gets_empty_outline() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), b"this is not a pdf").unwrap();

        let options = BatchOptions::new().with_format(JsonFormat::Compact);
        let report = process_directory(input.path(), output.path(), &options).unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.succeeded(), 0);
        let failed = report.failed().next().unwrap();
        assert!(failed.error.as_ref().unwrap().is_malformed_input());

        let json = fs::read_to_string(output.path().join("broken.json")).unwrap();
        assert_eq!(json.trim(), r#"{"title":"","outline":[]}"#);
    }
}
