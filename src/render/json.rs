//! JSON rendering for outlines.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline as JSON to `path`, creating parent directories.
pub fn write_json<P: AsRef<Path>>(outline: &Outline, path: P, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = to_json(outline, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Parse an outline back from JSON.
pub fn from_json(json: &str) -> Result<Outline> {
    serde_json::from_str(json).map_err(|e| Error::Other(format!("Invalid outline JSON: {}", e)))
}
