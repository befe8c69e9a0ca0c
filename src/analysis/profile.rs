//! Document-wide font statistics.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::TextLine;

/// Below this many lines there is no meaningful mode; the smallest size
/// observed is taken as body text instead.
pub const MIN_PROFILE_LINES: usize = 3;

/// Statistical baseline for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentProfile {
    /// Body text font size (character-weighted mode)
    pub body_size: f32,
    /// Smallest font size observed
    pub min_size: f32,
    /// Largest font size observed
    pub max_size: f32,
    /// Number of lines profiled
    pub line_count: usize,
    /// Total non-whitespace characters profiled
    pub total_chars: usize,
    /// Character weight per font size, keyed in tenths of a point
    pub size_histogram: BTreeMap<i32, usize>,
}

impl DocumentProfile {
    /// Scan all lines of a document once.
    ///
    /// Returns [`Error::EmptyDocument`] when there is nothing to profile.
    pub fn from_lines(lines: &[TextLine]) -> Result<Self> {
        let mut size_histogram: BTreeMap<i32, usize> = BTreeMap::new();
        let mut min_size = f32::MAX;
        let mut max_size = f32::MIN;
        let mut line_count = 0;
        let mut total_chars = 0;

        for line in lines {
            if !line.font_size.is_finite() || line.font_size <= 0.0 {
                continue;
            }
            // A line of pure whitespace cannot exist, but keep every line
            // visible in the histogram even if it has no weight.
            let weight = line.char_weight().max(1);
            *size_histogram.entry(size_key(line.font_size)).or_insert(0) += weight;
            min_size = min_size.min(line.font_size);
            max_size = max_size.max(line.font_size);
            line_count += 1;
            total_chars += line.char_weight();
        }

        if line_count == 0 {
            return Err(Error::EmptyDocument);
        }

        let body_size = if line_count < MIN_PROFILE_LINES {
            min_size
        } else {
            // BTreeMap iterates ascending, so on equal weight the first
            // (smaller) size is kept.
            let mut best: Option<(i32, usize)> = None;
            for (&key, &weight) in &size_histogram {
                if best.map_or(true, |(_, w)| weight > w) {
                    best = Some((key, weight));
                }
            }
            best.map(|(key, _)| key_size(key)).unwrap_or(min_size)
        };

        log::debug!(
            "Font profile: body={:.1}pt, range={:.1}-{:.1}pt, {} lines, {} sizes",
            body_size,
            min_size,
            max_size,
            line_count,
            size_histogram.len()
        );

        Ok(Self {
            body_size,
            min_size,
            max_size,
            line_count,
            total_chars,
            size_histogram,
        })
    }

    /// Font size relative to body text (0.0 = body size, 1.0 = twice as large).
    pub fn relative_size(&self, font_size: f32) -> f32 {
        if self.body_size <= 0.0 {
            return 0.0;
        }
        (font_size - self.body_size) / self.body_size
    }

    /// Whether `font_size` is the largest size in the document.
    pub fn is_max_size(&self, font_size: f32) -> bool {
        size_key(font_size) == size_key(self.max_size)
    }
}

/// Round a font size to 0.1pt precision.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}
