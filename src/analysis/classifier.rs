//! Heading classification: dynamic thresholds, title resolution, levels.
//!
//! Thresholds come from the document's own score distribution. Candidate
//! scores are ranked and the widest gaps between neighbouring scores become
//! the cut points between levels, so a level is always a contiguous score
//! band: every H1 outscores every H2, and every H2 outscores every H3.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::profile::{size_key, DocumentProfile};
use super::scorer::ScoredLine;
use crate::model::{HeadingCandidate, HeadingLevel};

/// Classifier settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    /// Minimum score for a line to be considered a heading at all
    pub heading_floor: f32,
    /// Minimum score gap that may separate two levels
    pub min_tier_gap: f32,
    /// Number of heading levels below the title
    pub max_levels: usize,
    /// Maximum number of lines merged into a multi-line title
    pub max_title_lines: usize,
    /// A text repeated on at least this many pages is a running header/footer
    pub running_header_min_pages: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            heading_floor: 3.5,
            min_tier_gap: 1.0,
            max_levels: 3,
            max_title_lines: 3,
            running_header_min_pages: 3,
        }
    }
}

/// Score cut points derived for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thresholds {
    /// Scores below the floor are body text
    pub floor: f32,
    /// Cut points between tiers, descending
    pub cuts: Vec<f32>,
}

impl Thresholds {
    /// Zero-based tier of a score (0 = most prominent), or `None` for body
    /// text.
    pub fn tier(&self, score: f32) -> Option<usize> {
        if score < self.floor {
            return None;
        }
        Some(self.cuts.iter().filter(|&&cut| score < cut).count())
    }

    /// Derive cut points from candidate scores by largest-gap partitioning.
    ///
    /// Scores are compared at 0.01 resolution. At most `max_tiers - 1` cuts
    /// are placed, each at the midpoint of one of the widest gaps of at
    /// least `min_gap`; ties go to the gap ranked higher.
    pub fn from_scores(scores: &[f32], floor: f32, min_gap: f32, max_tiers: usize) -> Self {
        let distinct: BTreeSet<i64> = scores
            .iter()
            .filter(|s| s.is_finite() && **s >= floor)
            .map(|s| score_key(*s))
            .collect();
        let ranked: Vec<i64> = distinct.into_iter().rev().collect();
        let min_gap_key = score_key(min_gap);

        let mut gaps: Vec<(i64, usize)> = ranked
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (pair[0] - pair[1], i))
            .filter(|(width, _)| *width >= min_gap_key)
            .collect();
        gaps.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut cuts: Vec<f32> = gaps
            .iter()
            .take(max_tiers.saturating_sub(1))
            .map(|&(_, i)| (ranked[i] + ranked[i + 1]) as f32 / 200.0)
            .collect();
        cuts.sort_by(|a, b| b.total_cmp(a));

        Self { floor, cuts }
    }
}

fn score_key(score: f32) -> i64 {
    (score * 100.0).round() as i64
}

/// Result of classifying one document.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Title and heading candidates in reading order
    pub candidates: Vec<HeadingCandidate>,
    /// Best-effort title when no line qualified as one
    pub fallback_title: Option<String>,
    /// Thresholds used for title eligibility (full candidate pool)
    pub title_thresholds: Thresholds,
    /// Thresholds used for H1/H2/H3 (title lines removed)
    pub level_thresholds: Thresholds,
}

/// Assigns heading levels to scored lines.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    settings: ClassifierSettings,
}

impl HeadingClassifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classify all scored lines of one document.
    ///
    /// `scored` must hold every line of the document; duplicates of a heading
    /// text keep their first occurrence in reading order.
    pub fn classify(&self, scored: &[ScoredLine<'_>], profile: &DocumentProfile) -> Classification {
        let Some(first_page) = scored.iter().map(|s| s.line.page).min() else {
            return Classification::default();
        };

        let running = self.running_headers(scored);
        let mut pool: Vec<usize> = scored
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.score >= self.settings.heading_floor
                    && !s.features.is_noise()
                    && (s.features.is_numbered() || !running.contains(&running_key(&s.line.text)))
            })
            .map(|(i, _)| i)
            .collect();
        pool.sort_by(|&a, &b| scored[a].line.reading_order(scored[b].line));

        let title_thresholds = self.thresholds_for(scored, &pool);
        let title_lines = self.resolve_title(scored, &pool, &title_thresholds, profile, first_page);

        let remaining: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|i| !title_lines.contains(i))
            .collect();
        let level_thresholds = self.thresholds_for(scored, &remaining);

        let mut candidates: Vec<HeadingCandidate> = title_lines
            .iter()
            .map(|&i| candidate(&scored[i], HeadingLevel::Title))
            .collect();

        let title_text: String = title_lines
            .iter()
            .map(|&i| scored[i].line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut seen: HashSet<&str> = title_lines
            .iter()
            .map(|&i| scored[i].line.text.as_str())
            .collect();
        seen.insert(title_text.as_str());
        for &i in &remaining {
            let s = &scored[i];
            let Some(level) = level_thresholds.tier(s.score).and_then(HeadingLevel::from_tier)
            else {
                continue;
            };
            if !seen.insert(s.line.text.as_str()) {
                continue;
            }
            candidates.push(candidate(s, level));
        }
        candidates.sort_by(|a, b| a.reading_order(b));

        let fallback_title = if !title_lines.is_empty() {
            None
        } else if pool.is_empty() {
            best_effort_title(scored, first_page, |_| true)
        } else {
            // Numbered sections stay headings; body text is never the title
            best_effort_title(scored, first_page, |s| {
                !s.features.is_numbered() && s.line.font_size > profile.body_size
            })
        };

        log::debug!(
            "Classified {} lines: pool={}, title_lines={}, headings={}, cuts={:?}",
            scored.len(),
            pool.len(),
            title_lines.len(),
            candidates.len() - title_lines.len(),
            level_thresholds.cuts
        );

        Classification {
            candidates,
            fallback_title,
            title_thresholds,
            level_thresholds,
        }
    }

    fn thresholds_for(&self, scored: &[ScoredLine<'_>], indices: &[usize]) -> Thresholds {
        let scores: Vec<f32> = indices.iter().map(|&i| scored[i].score).collect();
        Thresholds::from_scores(
            &scores,
            self.settings.heading_floor,
            self.settings.min_tier_gap,
            self.settings.max_levels,
        )
    }

    /// Pick the title line (plus continuation lines) among unnumbered
    /// candidates on the first page: the document's largest type first, then
    /// the strongest top-tier line, then the largest type above body size.
    /// Returns indices in reading order.
    fn resolve_title(
        &self,
        scored: &[ScoredLine<'_>],
        pool: &[usize],
        thresholds: &Thresholds,
        profile: &DocumentProfile,
        first_page: u32,
    ) -> Vec<usize> {
        let first_page_lines: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| {
                let s = &scored[i];
                s.line.page == first_page && !s.features.is_numbered()
            })
            .collect();

        // Largest type in the whole document marks the title whatever its score.
        let largest = first_page_lines
            .iter()
            .copied()
            .filter(|&i| {
                let size = scored[i].line.font_size;
                profile.is_max_size(size) && size > profile.body_size
            })
            .min_by(|&a, &b| scored[a].line.reading_order(scored[b].line));

        let strongest = || {
            first_page_lines
                .iter()
                .copied()
                .filter(|&i| thresholds.tier(scored[i].score) == Some(0))
                .min_by(|&a, &b| {
                    scored[b]
                        .score
                        .total_cmp(&scored[a].score)
                        .then(scored[a].line.reading_order(scored[b].line))
                })
        };

        // Otherwise the largest first-page heading, even below the top tier.
        let most_prominent = || {
            first_page_lines
                .iter()
                .copied()
                .filter(|&i| scored[i].line.font_size > profile.body_size)
                .min_by(|&a, &b| {
                    size_key(scored[b].line.font_size)
                        .cmp(&size_key(scored[a].line.font_size))
                        .then(scored[a].line.reading_order(scored[b].line))
                })
        };

        let anchor = largest.or_else(strongest).or_else(most_prominent);

        match anchor {
            Some(anchor) => self.extend_title(scored, anchor, profile),
            None => Vec::new(),
        }
    }

    /// Grow a title around `anchor` with adjacent lines of the same style.
    fn extend_title(
        &self,
        scored: &[ScoredLine<'_>],
        anchor: usize,
        profile: &DocumentProfile,
    ) -> Vec<usize> {
        let head = scored[anchor].line;
        if head.font_size <= profile.body_size {
            return vec![anchor];
        }

        let mut page_order: Vec<usize> = (0..scored.len())
            .filter(|&i| scored[i].line.page == head.page)
            .collect();
        page_order.sort_by(|&a, &b| scored[a].line.reading_order(scored[b].line));
        let Some(pos) = page_order.iter().position(|&i| i == anchor) else {
            return vec![anchor];
        };

        let mut start = pos;
        let mut end = pos;
        while end - start + 1 < self.settings.max_title_lines {
            if start > 0 && self.continues_title(scored, page_order[start - 1], page_order[start]) {
                start -= 1;
            } else if end + 1 < page_order.len()
                && self.continues_title(scored, page_order[end], page_order[end + 1])
            {
                end += 1;
            } else {
                break;
            }
        }

        page_order[start..=end].to_vec()
    }

    /// Whether `next` directly continues the title line `prev`.
    fn continues_title(&self, scored: &[ScoredLine<'_>], prev: usize, next: usize) -> bool {
        let (a, b) = (&scored[prev], &scored[next]);
        if a.score < self.settings.heading_floor || b.score < self.settings.heading_floor {
            return false;
        }
        if a.features.is_noise() || b.features.is_noise() {
            return false;
        }
        let (a, b) = (a.line, b.line);
        if (a.font_size - b.font_size).abs() > 0.5 || a.is_bold != b.is_bold {
            return false;
        }
        let advance = b.bbox.y0 - a.bbox.y0;
        advance > 0.0 && advance <= 2.0 * a.font_size.max(b.font_size)
    }

    /// Normalized texts that repeat across many pages.
    fn running_headers(&self, scored: &[ScoredLine<'_>]) -> HashSet<String> {
        let mut pages_by_text: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
        let mut all_pages: BTreeSet<u32> = BTreeSet::new();
        for s in scored {
            all_pages.insert(s.line.page);
            pages_by_text
                .entry(running_key(&s.line.text))
                .or_default()
                .insert(s.line.page);
        }

        let min_pages = self
            .settings
            .running_header_min_pages
            .max(all_pages.len().div_ceil(2));
        pages_by_text
            .into_iter()
            .filter(|(key, pages)| !key.is_empty() && pages.len() >= min_pages)
            .map(|(key, _)| key)
            .collect()
    }
}

fn candidate(scored: &ScoredLine<'_>, level: HeadingLevel) -> HeadingCandidate {
    HeadingCandidate {
        text: scored.line.text.clone(),
        level,
        page: scored.line.page,
        score: scored.score,
        y: scored.line.bbox.y0,
        x: scored.line.bbox.x0,
    }
}

/// Largest-font non-noise line on the first page, topmost among ties.
fn best_effort_title<F>(scored: &[ScoredLine<'_>], first_page: u32, accept: F) -> Option<String>
where
    F: Fn(&ScoredLine<'_>) -> bool,
{
    scored
        .iter()
        .filter(|s| s.line.page == first_page && !s.features.is_noise() && accept(s))
        .min_by(|a, b| {
            size_key(b.line.font_size)
                .cmp(&size_key(a.line.font_size))
                .then(a.line.reading_order(b.line))
        })
        .map(|s| s.line.text.clone())
}

/// Text with leading and trailing page numbers removed, lowercased.
fn running_key(text: &str) -> String {
    fn is_folio(word: &str) -> bool {
        !word.chars().any(char::is_alphabetic)
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| !is_folio(w))
        .unwrap_or(words.len());
    let end = words
        .iter()
        .rposition(|w| !is_folio(w))
        .map_or(start, |i| i + 1);
    words[start..end].join(" ").to_lowercase()
}
