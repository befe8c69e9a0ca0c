//! Synthetic PDFs for integration tests, built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Fonts available on every generated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn resource_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
            Font::Italic => b"F3",
        }
    }
}

#[derive(Debug, Clone)]
struct Item {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

/// Builds a Letter-sized PDF, one `page()` call per page.
#[derive(Debug, Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Item>>,
}

pub const BODY: &str = "The committee met twice during the quarter to review progress on the plan";

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Place a line of text with its baseline at `y` (PDF coordinates,
    /// origin bottom-left).
    pub fn text(mut self, font: Font, size: f32, x: f32, y: f32, text: &str) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(Item {
                font,
                size,
                x,
                y,
                text: text.to_string(),
            });
        }
        self
    }

    /// `count` lines of regular body text going down from `top`.
    pub fn paragraph(mut self, size: f32, top: f32, count: usize) -> Self {
        for i in 0..count {
            self = self.text(Font::Regular, size, 72.0, top - i as f32 * size * 1.4, BODY);
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let italic = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Oblique",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
                "F3" => italic,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for items in &self.pages {
            let mut operations = Vec::new();
            for item in items {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(item.font.resource_name().to_vec()),
                        Object::Real(item.size),
                    ],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(item.x), Object::Real(item.y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(item.text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save synthetic pdf");
        buf
    }
}
