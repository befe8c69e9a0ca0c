//! Heading-classification core.
//!
//! Two passes over a document's lines: [`DocumentProfile::from_lines`]
//! collects font statistics, then every line is scored against that
//! baseline and the [`HeadingClassifier`] turns scores into levels.
//! Nothing here knows whether the lines came from the PDF text layer or
//! from OCR.

mod classifier;
mod profile;
mod scorer;

pub use classifier::{Classification, ClassifierSettings, HeadingClassifier, Thresholds};
pub use profile::{size_key, DocumentProfile, MIN_PROFILE_LINES};
pub use scorer::{FeatureScores, LineScorer, ScoredLine, ScoringWeights};

use crate::error::Error;
use crate::model::{Outline, TextLine};

/// Profiler, scorer and classifier bundled for one configuration.
#[derive(Debug, Clone, Default)]
pub struct OutlineAnalyzer {
    scorer: LineScorer,
    classifier: HeadingClassifier,
}

/// Everything the analyzer computed for one document.
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub profile: DocumentProfile,
    pub scored: Vec<ScoredLine<'a>>,
    pub classification: Classification,
}

impl Analysis<'_> {
    /// Assemble the final outline.
    pub fn outline(&self) -> Outline {
        Outline::assemble(
            self.classification.candidates.clone(),
            self.classification.fallback_title.clone(),
        )
    }
}

impl OutlineAnalyzer {
    pub fn new(weights: ScoringWeights, settings: ClassifierSettings) -> Self {
        Self {
            scorer: LineScorer::new(weights),
            classifier: HeadingClassifier::new(settings),
        }
    }

    pub fn scorer(&self) -> &LineScorer {
        &self.scorer
    }

    pub fn classifier(&self) -> &HeadingClassifier {
        &self.classifier
    }

    /// Run both passes over a document's lines.
    ///
    /// Returns `None` for a document without lines.
    pub fn analyze<'a>(&self, lines: &'a [TextLine]) -> Option<Analysis<'a>> {
        let profile = match DocumentProfile::from_lines(lines) {
            Ok(profile) => profile,
            Err(Error::EmptyDocument) => return None,
            Err(e) => {
                log::warn!("Font profiling failed: {}", e);
                return None;
            }
        };
        let scored = self.scorer.score_all(lines, &profile);
        let classification = self.classifier.classify(&scored, &profile);
        Some(Analysis {
            profile,
            scored,
            classification,
        })
    }

    /// Build the outline of a document from its lines.
    ///
    /// An empty document yields an empty outline.
    pub fn outline(&self, lines: &[TextLine]) -> Outline {
        self.analyze(lines)
            .map(|analysis| analysis.outline())
            .unwrap_or_else(Outline::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingLevel};

    fn line(page: u32, text: &str, size: f32, y: f32) -> TextLine {
        TextLine::new(page, text, size, BoundingBox::new(72.0, y, 500.0, y + size)).unwrap()
    }

    fn paragraph(page: u32, start_y: f32, count: usize, size: f32) -> Vec<TextLine> {
        (0..count)
            .map(|i| {
                line(
                    page,
                    "Body text continues here with an ordinary sentence of moderate length.",
                    size,
                    start_y + i as f32 * size * 1.3,
                )
            })
            .collect()
    }

    #[test]
    fn test_single_large_heading_becomes_title() {
        let mut lines = vec![line(1, "Introduction", 24.0, 72.0).bold()];
        lines.extend(paragraph(1, 120.0, 10, 11.0));

        let outline = OutlineAnalyzer::default().outline(&lines);
        let as_h1 = outline
            .headings_at(HeadingLevel::H1)
            .any(|h| h.text == "Introduction");
        assert!(outline.title == "Introduction" || as_h1);
    }

    #[test]
    fn test_numbered_sections_levels() {
        let mut lines = vec![line(1, "1. Overview", 14.0, 72.0).bold()];
        lines.extend(paragraph(1, 100.0, 4, 10.0));
        lines.push(line(1, "1.1 Background", 12.0, 170.0).bold());
        lines.extend(paragraph(1, 190.0, 4, 10.0));

        let outline = OutlineAnalyzer::default().outline(&lines);
        let h1: Vec<&str> = outline
            .headings_at(HeadingLevel::H1)
            .map(|h| h.text.as_str())
            .collect();
        let h2: Vec<&str> = outline
            .headings_at(HeadingLevel::H2)
            .map(|h| h.text.as_str())
            .collect();
        assert_eq!(h1, vec!["1. Overview"]);
        assert_eq!(h2, vec!["1.1 Background"]);
    }

    #[test]
    fn test_empty_document() {
        let outline = OutlineAnalyzer::default().outline(&[]);
        assert_eq!(outline, Outline::empty());
        assert!(OutlineAnalyzer::default().analyze(&[]).is_none());
    }

    #[test]
    fn test_idempotent() {
        let mut lines = vec![line(1, "Quarterly Review", 20.0, 60.0).bold()];
        lines.extend(paragraph(1, 100.0, 6, 10.0));
        lines.push(line(2, "Findings", 15.0, 60.0).bold());
        lines.extend(paragraph(2, 90.0, 6, 10.0));
        lines.push(line(2, "Regional Detail", 12.0, 200.0).bold());
        lines.extend(paragraph(2, 220.0, 6, 10.0));

        let analyzer = OutlineAnalyzer::default();
        let first = serde_json::to_string(&analyzer.outline(&lines)).unwrap();
        let second = serde_json::to_string(&analyzer.outline(&lines)).unwrap();
        assert_eq!(first, second);
    }
}
