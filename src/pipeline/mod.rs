//! Outline extraction pipeline.
//!
//! Drives a primary [`LineExtractor`] over every page, decides which pages
//! need the OCR fallback, and hands the collected lines to the analyzer.

mod options;

pub use options::{ErrorMode, OcrConfig, OcrPolicy, OutlineOptions, MIN_PAGE_CHARS, MIN_TEXT_CHARS};

use crate::analysis::OutlineAnalyzer;
use crate::error::Result;
use crate::extract::{text_chars, LineExtractor};
use crate::model::{Outline, TextLine};

/// Lines of one document and how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct DocumentLines {
    /// All lines, page by page
    pub lines: Vec<TextLine>,
    /// Number of pages in the document
    pub page_count: u32,
    /// Pages whose text layer could not be read
    pub failed_pages: Vec<u32>,
    /// Pages whose lines came from OCR
    pub ocr_pages: Vec<u32>,
}

impl DocumentLines {
    /// Number of non-whitespace characters extracted.
    pub fn text_chars(&self) -> usize {
        text_chars(&self.lines)
    }
}

/// Runs extraction and analysis for one document at a time.
pub struct OutlinePipeline<'a> {
    options: &'a OutlineOptions,
    analyzer: OutlineAnalyzer,
}

impl<'a> OutlinePipeline<'a> {
    pub fn new(options: &'a OutlineOptions) -> Self {
        Self {
            options,
            analyzer: options.analyzer(),
        }
    }

    pub fn analyzer(&self) -> &OutlineAnalyzer {
        &self.analyzer
    }

    /// Extract the outline of one document.
    pub fn run<F>(&self, primary: &dyn LineExtractor, fallback: F) -> Result<Outline>
    where
        F: FnOnce() -> Option<Box<dyn LineExtractor + 'a>>,
    {
        let document = self.collect_lines(primary, fallback)?;
        let outline = self.analyzer.outline(&document.lines);
        log::info!(
            "Outline: {} pages, {} lines, title {:?}, {} headings",
            document.page_count,
            document.lines.len(),
            outline.title,
            outline.headings.len()
        );
        Ok(outline)
    }

    /// Collect the lines of every page.
    ///
    /// `fallback` is only called when the OCR policy asks for pages to be
    /// recognized; it returns `None` when OCR is unavailable.
    pub fn collect_lines<F>(&self, primary: &dyn LineExtractor, fallback: F) -> Result<DocumentLines>
    where
        F: FnOnce() -> Option<Box<dyn LineExtractor + 'a>>,
    {
        let page_count = primary.page_count();
        let mut pages: Vec<Vec<TextLine>> = Vec::with_capacity(page_count as usize);
        let mut failed_pages = Vec::new();

        for page in 1..=page_count {
            match primary.extract_page(page) {
                Ok(lines) => pages.push(lines),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", page, e);
                    failed_pages.push(page);
                    pages.push(Vec::new());
                }
            }
        }

        let ocr_targets = self.ocr_targets(&pages);
        let mut ocr_pages = Vec::new();
        if !ocr_targets.is_empty() {
            log::info!(
                "{} of {} pages need OCR ({} extractor found {} characters)",
                ocr_targets.len(),
                page_count,
                primary.name(),
                pages.iter().map(|p| text_chars(p)).sum::<usize>()
            );
            match fallback() {
                Some(ocr) => {
                    for page in ocr_targets {
                        match ocr.extract_page(page) {
                            Ok(lines) if !lines.is_empty() => {
                                pages[(page - 1) as usize] = lines;
                                ocr_pages.push(page);
                            }
                            Ok(_) => log::debug!("Page {}: OCR found no text", page),
                            Err(e) => log::warn!("OCR failed for page {}: {}", page, e),
                        }
                    }
                }
                None => log::warn!("OCR is unavailable; continuing with the text layer only"),
            }
        }

        Ok(DocumentLines {
            lines: pages.into_iter().flatten().collect(),
            page_count,
            failed_pages,
            ocr_pages,
        })
    }

    /// Pages the OCR policy selects, given the text-layer result.
    fn ocr_targets(&self, pages: &[Vec<TextLine>]) -> Vec<u32> {
        let all_pages = || (1..=pages.len() as u32).collect::<Vec<_>>();
        match self.options.ocr_policy {
            OcrPolicy::Disabled => Vec::new(),
            OcrPolicy::EmptyDocument => {
                let chars: usize = pages.iter().map(|p| text_chars(p)).sum();
                if chars < self.options.min_text_chars {
                    all_pages()
                } else {
                    Vec::new()
                }
            }
            OcrPolicy::EmptyPages => all_pages()
                .into_iter()
                .filter(|&page| text_chars(&pages[(page - 1) as usize]) < self.options.min_page_chars)
                .collect(),
        }
    }
}
