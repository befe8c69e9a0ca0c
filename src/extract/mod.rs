//! Line extraction.
//!
//! Every provider turns one page of a PDF into positioned [`TextLine`]s.
//! The analysis core only ever sees `TextLine`s, so providers are
//! interchangeable: the native text-layer reader is the primary source and
//! OCR (feature `ocr`) fills in pages without a usable text layer.

mod native;
#[cfg(feature = "ocr")]
mod ocr;

pub use native::NativeExtractor;
#[cfg(feature = "ocr")]
pub use ocr::OcrExtractor;

use crate::error::Result;
use crate::model::TextLine;

/// A source of positioned text lines, one page at a time.
pub trait LineExtractor {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the lines of one page (1-indexed), in any order.
    fn extract_page(&self, page: u32) -> Result<Vec<TextLine>>;
}

/// Number of non-whitespace characters across lines.
pub fn text_chars(lines: &[TextLine]) -> usize {
    lines.iter().map(TextLine::char_weight).sum()
}
