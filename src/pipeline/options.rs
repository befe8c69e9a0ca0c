//! Outline extraction options and configuration.

use crate::analysis::{ClassifierSettings, OutlineAnalyzer, ScoringWeights};

/// Below this many characters in the whole document the text layer is
/// considered missing (scanned document).
pub const MIN_TEXT_CHARS: usize = 50;

/// Below this many characters a single page is considered image-only.
pub const MIN_PAGE_CHARS: usize = 10;

/// Options for extracting an outline.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Error handling mode for per-page extraction failures
    pub error_mode: ErrorMode,

    /// When to fall back to OCR
    pub ocr_policy: OcrPolicy,

    /// OCR engine configuration
    pub ocr: OcrConfig,

    /// Document-wide character minimum for [`OcrPolicy::EmptyDocument`]
    pub min_text_chars: usize,

    /// Per-page character minimum for [`OcrPolicy::EmptyPages`]
    pub min_page_chars: usize,

    /// Scoring weights
    pub weights: ScoringWeights,

    /// Classifier settings
    pub classifier: ClassifierSettings,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first page that cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set OCR policy.
    pub fn with_ocr_policy(mut self, policy: OcrPolicy) -> Self {
        self.ocr_policy = policy;
        self
    }

    /// Never run OCR.
    pub fn without_ocr(mut self) -> Self {
        self.ocr_policy = OcrPolicy::Disabled;
        self
    }

    /// Set OCR engine configuration.
    pub fn with_ocr_config(mut self, config: OcrConfig) -> Self {
        self.ocr = config;
        self
    }

    /// Set the document-wide character minimum.
    pub fn with_min_text_chars(mut self, chars: usize) -> Self {
        self.min_text_chars = chars;
        self
    }

    /// Set the per-page character minimum.
    pub fn with_min_page_chars(mut self, chars: usize) -> Self {
        self.min_page_chars = chars;
        self
    }

    /// Set scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set classifier settings.
    pub fn with_classifier(mut self, settings: ClassifierSettings) -> Self {
        self.classifier = settings;
        self
    }

    /// Build the analyzer these options describe.
    pub fn analyzer(&self) -> OutlineAnalyzer {
        OutlineAnalyzer::new(self.weights.clone(), self.classifier.clone())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            ocr_policy: OcrPolicy::EmptyDocument,
            ocr: OcrConfig::default(),
            min_text_chars: MIN_TEXT_CHARS,
            min_page_chars: MIN_PAGE_CHARS,
            weights: ScoringWeights::default(),
            classifier: ClassifierSettings::default(),
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Treat unreadable pages as empty and continue
    #[default]
    Lenient,
}

/// When the OCR fallback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrPolicy {
    /// Never
    Disabled,
    /// Only when the whole document has (almost) no text layer
    #[default]
    EmptyDocument,
    /// For every page whose text layer is (almost) empty
    EmptyPages,
}

impl std::str::FromStr for OcrPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(OcrPolicy::Disabled),
            "empty-document" | "document" => Ok(OcrPolicy::EmptyDocument),
            "empty-pages" | "pages" => Ok(OcrPolicy::EmptyPages),
            _ => Err(format!("Unknown OCR policy: {}", s)),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,
    /// Width in pixels pages are rendered at
    pub render_width: u32,
    /// Lines recognized below this confidence (0-100) are dropped
    pub min_confidence: i32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            render_width: 2000,
            min_confidence: 70,
        }
    }
}
