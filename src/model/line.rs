//! Positioned text lines, the common currency of all line extractors.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Axis-aligned box in top-down page coordinates (points, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a box, normalizing swapped corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A single line of text as emitted by an extraction provider.
///
/// Native and OCR extractors produce the same shape; nothing downstream
/// knows which one produced a given line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Page number (1-indexed)
    pub page: u32,
    /// Normalized text content (never empty)
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the line is predominantly set in a bold face
    pub is_bold: bool,
    /// Whether the line is predominantly set in an italic face
    pub is_italic: bool,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextLine {
    /// Create a line with regular style.
    ///
    /// Text is NFKC-normalized and whitespace runs are collapsed. Returns
    /// `None` when nothing printable remains or the font size is unusable.
    pub fn new(page: u32, text: &str, font_size: f32, bbox: BoundingBox) -> Option<Self> {
        let text = normalize_text(text);
        if text.is_empty() || !font_size.is_finite() || font_size <= 0.0 {
            return None;
        }

        Some(Self {
            page: page.max(1),
            text,
            font_size,
            is_bold: false,
            is_italic: false,
            bbox,
        })
    }

    /// Set the style flags.
    pub fn with_style(mut self, is_bold: bool, is_italic: bool) -> Self {
        self.is_bold = is_bold;
        self.is_italic = is_italic;
        self
    }

    /// Mark the line as bold.
    pub fn bold(self) -> Self {
        let italic = self.is_italic;
        self.with_style(true, italic)
    }

    /// Vertical reading position (top edge).
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of non-whitespace characters, used as the line's weight in
    /// font statistics.
    pub fn char_weight(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Reading-order comparison: page, then top edge, then left edge.
    pub fn reading_order(&self, other: &Self) -> std::cmp::Ordering {
        self.page
            .cmp(&other.page)
            .then(self.bbox.y0.total_cmp(&other.bbox.y0))
            .then(self.bbox.x0.total_cmp(&other.bbox.x0))
    }
}

/// Infer (bold, italic) from a PostScript font name such as
/// `ABCDEF+Helvetica-BoldOblique`.
pub fn style_from_font_name(font_name: &str) -> (bool, bool) {
    let lower = font_name.to_lowercase();
    let is_bold = lower.contains("bold")
        || lower.contains("black")
        || lower.contains("heavy")
        || lower.contains("semibold")
        || lower.ends_with(",b")
        || lower.contains("-b,");
    let is_italic = lower.contains("italic") || lower.contains("oblique");
    (is_bold, is_italic)
}

fn normalize_text(text: &str) -> String {
    let normalized: String = text
        .nfkc()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_normalized() {
        let line = TextLine::new(1, "  \u{FB01}nal   Report\t", 12.0, BoundingBox::default()).unwrap();
        assert_eq!(line.text, "final Report");
        assert_eq!(line.word_count(), 2);
        assert_eq!(line.char_weight(), 11);
    }

    #[test]
    fn test_rejects_empty_and_bad_size() {
        assert!(TextLine::new(1, "   ", 12.0, BoundingBox::default()).is_none());
        assert!(TextLine::new(1, "Text", 0.0, BoundingBox::default()).is_none());
        assert!(TextLine::new(1, "Text", f32::NAN, BoundingBox::default()).is_none());
    }

    #[test]
    fn test_page_is_one_based() {
        let line = TextLine::new(0, "Text", 10.0, BoundingBox::default()).unwrap();
        assert_eq!(line.page, 1);
    }

    #[test]
    fn test_style_from_font_name() {
        assert_eq!(style_from_font_name("Helvetica-Bold"), (true, false));
        assert_eq!(style_from_font_name("ABCDEF+Arial,BoldItalic"), (true, true));
        assert_eq!(style_from_font_name("Times-Oblique"), (false, true));
        assert_eq!(style_from_font_name("Helvetica"), (false, false));
    }

    #[test]
    fn test_bounding_box_normalizes_corners() {
        let bbox = BoundingBox::new(10.0, 50.0, 2.0, 40.0);
        assert_eq!(bbox.x0, 2.0);
        assert_eq!(bbox.y0, 40.0);
        assert_eq!(bbox.width(), 8.0);
        assert_eq!(bbox.height(), 10.0);
    }

    #[test]
    fn test_reading_order() {
        let a = TextLine::new(1, "a", 10.0, BoundingBox::new(0.0, 100.0, 10.0, 110.0)).unwrap();
        let b = TextLine::new(1, "b", 10.0, BoundingBox::new(0.0, 200.0, 10.0, 210.0)).unwrap();
        let c = TextLine::new(2, "c", 10.0, BoundingBox::new(0.0, 10.0, 10.0, 20.0)).unwrap();
        assert_eq!(a.reading_order(&b), std::cmp::Ordering::Less);
        assert_eq!(c.reading_order(&b), std::cmp::Ordering::Greater);
    }
}
