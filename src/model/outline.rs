//! Heading levels, classified candidates, and the final outline.

use serde::{Deserialize, Serialize};

/// Heading level, ordered from most to least prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    Title,
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Outline level for a zero-based score tier (tier 0 is H1).
    pub fn from_tier(tier: usize) -> Option<Self> {
        match tier {
            0 => Some(HeadingLevel::H1),
            1 => Some(HeadingLevel::H2),
            2 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line the classifier assigned a heading level to.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub text: String,
    pub level: HeadingLevel,
    /// Page number (1-indexed)
    pub page: u32,
    /// Score the level was derived from
    pub score: f32,
    /// Top edge on the page, for reading order
    pub y: f32,
    /// Left edge on the page, for reading order
    pub x: f32,
}

impl HeadingCandidate {
    /// Reading-order comparison: page, then top edge, then left edge.
    pub fn reading_order(&self, other: &Self) -> std::cmp::Ordering {
        self.page
            .cmp(&other.page)
            .then(self.y.total_cmp(&other.y))
            .then(self.x.total_cmp(&other.x))
    }
}

/// A single outline entry as serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// The document outline: a title plus headings in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    #[serde(rename = "outline")]
    pub headings: Vec<Heading>,
}

impl Outline {
    /// The outline of a document without any text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble an outline from classified candidates.
    ///
    /// `Title` candidates (a title may span several lines) are joined into
    /// the title in reading order; if there are none, `fallback_title` is
    /// used. Remaining candidates become headings in reading order.
    pub fn assemble(mut candidates: Vec<HeadingCandidate>, fallback_title: Option<String>) -> Self {
        candidates.sort_by(|a, b| a.reading_order(b));

        let title_parts: Vec<&str> = candidates
            .iter()
            .filter(|c| c.level == HeadingLevel::Title)
            .map(|c| c.text.as_str())
            .collect();
        let title = if title_parts.is_empty() {
            fallback_title.unwrap_or_default()
        } else {
            title_parts.join(" ")
        };

        let headings = candidates
            .into_iter()
            .filter(|c| c.level != HeadingLevel::Title)
            .map(|c| Heading {
                level: c.level,
                text: c.text,
                page: c.page,
            })
            .collect();

        Self { title, headings }
    }

    /// Check if the outline has neither a title nor headings.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.headings.is_empty()
    }

    /// Headings at the given level.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &Heading> {
        self.headings.iter().filter(move |h| h.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, level: HeadingLevel, page: u32, y: f32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level,
            page,
            score: 0.0,
            y,
            x: 72.0,
        }
    }

    #[test]
    fn test_assemble_orders_by_reading_position() {
        let outline = Outline::assemble(
            vec![
                candidate("Methods", HeadingLevel::H1, 2, 100.0),
                candidate("Background", HeadingLevel::H2, 1, 300.0),
                candidate("Overview", HeadingLevel::H1, 1, 200.0),
                candidate("Annual Report", HeadingLevel::Title, 1, 50.0),
            ],
            None,
        );

        assert_eq!(outline.title, "Annual Report");
        let texts: Vec<&str> = outline.headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Overview", "Background", "Methods"]);
    }

    #[test]
    fn test_assemble_joins_multiline_title() {
        let outline = Outline::assemble(
            vec![
                candidate("of the Committee", HeadingLevel::Title, 1, 80.0),
                candidate("Final Report", HeadingLevel::Title, 1, 50.0),
            ],
            None,
        );
        assert_eq!(outline.title, "Final Report of the Committee");
        assert!(outline.headings.is_empty());
    }

    #[test]
    fn test_assemble_fallback_title() {
        let outline = Outline::assemble(vec![], Some("Untitled memo".to_string()));
        assert_eq!(outline.title, "Untitled memo");
        assert!(Outline::assemble(vec![], None).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let outline = Outline {
            title: "Doc".to_string(),
            headings: vec![Heading {
                level: HeadingLevel::H2,
                text: "1.1 Scope".to_string(),
                page: 3,
            }],
        };
        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Doc","outline":[{"level":"H2","text":"1.1 Scope","page":3}]}"#
        );
    }

    #[test]
    fn test_level_ordering() {
        assert!(HeadingLevel::Title < HeadingLevel::H1);
        assert!(HeadingLevel::H1 < HeadingLevel::H2);
        assert!(HeadingLevel::H2 < HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_tier(2), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_tier(3), None);
    }
}
