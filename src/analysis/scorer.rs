//! Heading-likelihood scoring.
//!
//! A line's score is the sum of independent feature contributions. Only the
//! font-size feature depends on the document (through its body size); all
//! weights are fixed constants in [`ScoringWeights`].

use regex::Regex;

use super::profile::DocumentProfile;
use crate::model::TextLine;

/// Weight table for the scoring features.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Points per 100% of size above body text
    pub size_gain: f32,
    /// Relative size above which larger fonts stop adding points
    pub max_relative_size: f32,
    /// Points per 100% of size below body text (subtracted)
    pub shrink_penalty: f32,
    /// Bonus for bold lines
    pub bold: f32,
    /// Bonus for italic lines that are not bold
    pub italic: f32,
    /// Bonus for numbered-section / chapter / appendix patterns
    pub pattern: f32,
    /// Bonus for lines of at most 4 words
    pub very_short: f32,
    /// Bonus for lines of at most 10 words
    pub short: f32,
    /// Penalty per word beyond `long_after_words`
    pub per_extra_word: f32,
    /// Word count above which lines are penalized
    pub long_after_words: usize,
    /// Cap on the length penalty
    pub max_length_penalty: f32,
    /// Bonus for all-uppercase lines
    pub uppercase: f32,
    /// Bonus for title-cased lines
    pub title_case: f32,
    /// Penalty for lines ending in `.`, `,` or `;`
    pub sentence_end: f32,
    /// Bonus for lines ending in `:`
    pub colon_end: f32,
    /// Penalty for page numbers, URLs, e-mail addresses and similar noise
    pub noise: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            size_gain: 10.0,
            max_relative_size: 2.0,
            shrink_penalty: 4.0,
            bold: 2.0,
            italic: 0.5,
            pattern: 3.0,
            very_short: 1.5,
            short: 0.75,
            per_extra_word: 0.25,
            long_after_words: 12,
            max_length_penalty: 5.0,
            uppercase: 1.5,
            title_case: 0.75,
            sentence_end: 2.0,
            colon_end: 0.5,
            noise: 20.0,
        }
    }
}

/// Per-feature contributions of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureScores {
    pub font_size: f32,
    pub style: f32,
    pub pattern: f32,
    pub length: f32,
    pub capitalization: f32,
    pub punctuation: f32,
    pub noise: f32,
}

impl FeatureScores {
    pub fn total(&self) -> f32 {
        self.font_size
            + self.style
            + self.pattern
            + self.length
            + self.capitalization
            + self.punctuation
            + self.noise
    }

    /// Whether the line matched a numbered-section style pattern.
    pub fn is_numbered(&self) -> bool {
        self.pattern > 0.0
    }

    /// Whether the line was recognized as page furniture or other noise.
    pub fn is_noise(&self) -> bool {
        self.noise < 0.0
    }
}

/// A line together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLine<'a> {
    pub line: &'a TextLine,
    pub score: f32,
    pub features: FeatureScores,
}

/// Words that stay lowercase in title-cased headings.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "of", "on", "or",
    "the", "to", "vs", "via", "with",
];

/// Scores lines against a document profile.
#[derive(Debug, Clone)]
pub struct LineScorer {
    weights: ScoringWeights,
    heading_patterns: Vec<Regex>,
    noise_patterns: Vec<Regex>,
}

impl LineScorer {
    /// Create a scorer with the given weights.
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            heading_patterns: vec![
                // 1. Overview / 1.1 Background / 2.3.1 Details
                Regex::new(r"^\d{1,3}(?:\.\d{1,3})*\.?\s+\p{Lu}").unwrap(),
                Regex::new(r"^(?i:chapter|section|part)\s+(?:\d+|[IVXLC]+|[A-Z])\b").unwrap(),
                Regex::new(r"^(?i:appendix|annex)\s+(?:[A-Z]|\d+)\b").unwrap(),
                // IV. Results
                Regex::new(r"^[IVXLC]{1,6}\.\s+\S").unwrap(),
                // A. Background
                Regex::new(r"^[A-Z]\.\s+\p{Lu}").unwrap(),
            ],
            noise_patterns: vec![
                Regex::new(r"^[\d\s.,/:-]+$").unwrap(),
                Regex::new(r"^(?i:page)\s+\d+(?:\s+(?i:of)\s+\d+)?$").unwrap(),
                Regex::new(r"^\d+\s+(?i:of)\s+\d+$").unwrap(),
                Regex::new(r"^(?i:https?://|www\.)").unwrap(),
                Regex::new(r"\S+@\S+\.\S+").unwrap(),
                Regex::new(r"^\([^)]*\)$").unwrap(),
            ],
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single line.
    pub fn score<'a>(&self, line: &'a TextLine, profile: &DocumentProfile) -> ScoredLine<'a> {
        let features = self.features(line, profile);
        ScoredLine {
            line,
            score: features.total(),
            features,
        }
    }

    /// Score every line of a document, preserving order.
    pub fn score_all<'a>(
        &self,
        lines: &'a [TextLine],
        profile: &DocumentProfile,
    ) -> Vec<ScoredLine<'a>> {
        lines.iter().map(|line| self.score(line, profile)).collect()
    }

    /// Compute the feature breakdown of a line.
    pub fn features(&self, line: &TextLine, profile: &DocumentProfile) -> FeatureScores {
        let text = line.text.as_str();
        FeatureScores {
            font_size: self.font_size_feature(profile.relative_size(line.font_size)),
            style: self.style_feature(line.is_bold, line.is_italic),
            pattern: if self.is_section_pattern(text) {
                self.weights.pattern
            } else {
                0.0
            },
            length: self.length_feature(line.word_count(), text.chars().count()),
            capitalization: self.capitalization_feature(text),
            punctuation: self.punctuation_feature(text),
            noise: if self.is_noise(text) {
                -self.weights.noise
            } else {
                0.0
            },
        }
    }

    /// Whether the text starts like a numbered section, chapter or appendix.
    pub fn is_section_pattern(&self, text: &str) -> bool {
        self.heading_patterns.iter().any(|re| re.is_match(text))
    }

    /// Whether the text is page furniture or otherwise cannot be a heading.
    pub fn is_noise(&self, text: &str) -> bool {
        let alphanumeric = text.chars().filter(|c| c.is_alphanumeric()).count();
        alphanumeric < 2 || self.noise_patterns.iter().any(|re| re.is_match(text))
    }

    fn font_size_feature(&self, relative: f32) -> f32 {
        if relative > 0.0 {
            self.weights.size_gain * relative.min(self.weights.max_relative_size)
        } else {
            self.weights.shrink_penalty * relative.max(-1.0)
        }
    }

    fn style_feature(&self, is_bold: bool, is_italic: bool) -> f32 {
        if is_bold {
            self.weights.bold
        } else if is_italic {
            self.weights.italic
        } else {
            0.0
        }
    }

    fn length_feature(&self, words: usize, chars: usize) -> f32 {
        let w = &self.weights;
        if chars > 200 {
            return -w.max_length_penalty;
        }
        match words {
            0..=4 => w.very_short,
            5..=10 => w.short,
            n if n <= w.long_after_words => 0.0,
            n => -(w.per_extra_word * (n - w.long_after_words) as f32).min(w.max_length_penalty),
        }
    }

    fn capitalization_feature(&self, text: &str) -> f32 {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase()) {
            return self.weights.uppercase;
        }
        if is_title_case(text) {
            return self.weights.title_case;
        }
        0.0
    }

    fn punctuation_feature(&self, text: &str) -> f32 {
        // "1." or "2.3." on its own is a section number, not a sentence end
        if text.ends_with('.') && text.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return 0.0;
        }
        match text.chars().last() {
            Some('.') | Some(',') | Some(';') => -self.weights.sentence_end,
            Some(':') => self.weights.colon_end,
            _ => 0.0,
        }
    }
}

impl Default for LineScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

/// Every significant word starts with an uppercase letter.
fn is_title_case(text: &str) -> bool {
    let mut seen_word = false;
    for word in text.split_whitespace() {
        let Some(first) = word.chars().find(|c| c.is_alphanumeric()) else {
            continue;
        };
        if !first.is_alphabetic() {
            continue;
        }
        let lower = word.to_lowercase();
        let minor = MINOR_WORDS.contains(&lower.trim_matches(|c: char| !c.is_alphabetic()));
        if !first.is_uppercase() && (!seen_word || !minor) {
            return false;
        }
        seen_word = true;
    }
    seen_word
}
