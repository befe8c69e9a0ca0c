//! Rendering of outlines to JSON and plain text.

mod json;
mod text;

pub use json::{from_json, to_json, write_json, JsonFormat};
pub use text::to_text;
