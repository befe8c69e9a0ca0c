//! Indented plain-text rendering of an outline, for terminals.

use std::fmt::Write;

use crate::model::{HeadingLevel, Outline};

/// Render an outline as an indented tree, one heading per line.
pub fn to_text(outline: &Outline) -> String {
    let mut output = String::new();
    if outline.title.is_empty() {
        output.push_str("(untitled)\n");
    } else {
        let _ = writeln!(output, "{}", outline.title);
    }

    for heading in &outline.headings {
        let depth = match heading.level {
            HeadingLevel::Title | HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        };
        let _ = writeln!(
            output,
            "{}{} {} (p. {})",
            "  ".repeat(depth),
            heading.level,
            heading.text,
            heading.page
        );
    }
    output
}
