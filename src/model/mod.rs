//! Model types shared by extractors, the analysis core, and renderers.
//!
//! Lines flow in from extraction providers; outlines flow out of the
//! classifier. Both are plain data and carry no reference to the PDF they
//! came from.

mod line;
mod outline;

pub use line::{style_from_font_name, BoundingBox, TextLine};
pub use outline::{Heading, HeadingCandidate, HeadingLevel, Outline};
