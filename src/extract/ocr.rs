//! OCR fallback for pages without a text layer.
//!
//! Pages are rasterized with pdfium and recognized line by line with
//! Tesseract. OCR carries no style information, so every line is regular
//! weight; the font size is estimated from the height of the line box.

use std::io::Cursor;

use leptess::LepTess;
use pdfium_render::prelude::*;

use super::LineExtractor;
use crate::error::{Error, Result};
use crate::model::{BoundingBox, TextLine};
use crate::pipeline::OcrConfig;

/// A recognized line box is roughly 1.2 em tall (ascender to descender).
const LINE_BOX_EM: f32 = 1.2;

/// Recognizes text lines on rendered pages.
pub struct OcrExtractor {
    pdfium: Pdfium,
    data: Vec<u8>,
    page_count: u32,
    config: OcrConfig,
}

impl OcrExtractor {
    /// Bind pdfium and Tesseract for a PDF held in memory.
    pub fn from_bytes(data: Vec<u8>, config: OcrConfig) -> Result<Self> {
        let pdfium = Pdfium::new(
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| Error::Render(format!("Failed to bind pdfium library: {:?}", e)))?,
        );

        LepTess::new(None, &config.language).map_err(|e| {
            Error::Ocr(format!(
                "Failed to initialize Tesseract with language '{}': {}",
                config.language, e
            ))
        })?;

        let page_count = {
            let document = pdfium
                .load_pdf_from_byte_slice(&data, None)
                .map_err(|e| Error::Render(format!("{:?}", e)))?;
            document.pages().len() as u32
        };

        Ok(Self {
            pdfium,
            data,
            page_count,
            config,
        })
    }

    /// Render one page; returns the PNG-encoded image and points per pixel.
    fn render_page(&self, page: u32) -> Result<(Vec<u8>, f32)> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(&self.data, None)
            .map_err(|e| Error::Render(format!("{:?}", e)))?;
        let pdf_page = document
            .pages()
            .get((page - 1) as u16)
            .map_err(|e| Error::Render(format!("Page {}: {:?}", page, e)))?;

        let width = self.config.render_width as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(width)
            .set_maximum_height(width * 2);
        let image = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| Error::Render(format!("Page {}: {:?}", page, e)))?
            .as_image();

        if image.width() == 0 || image.height() == 0 {
            return Err(Error::Render(format!("Page {}: empty bitmap", page)));
        }
        let points_per_pixel = pdf_page.width().value / image.width() as f32;
        log::debug!(
            "Rendered page {} at {}x{} px",
            page,
            image.width(),
            image.height()
        );

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| Error::Render(format!("Failed to encode page {}: {}", page, e)))?;
        Ok((png.into_inner(), points_per_pixel))
    }
}

impl LineExtractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn extract_page(&self, page: u32) -> Result<Vec<TextLine>> {
        if page == 0 || page > self.page_count {
            return Err(Error::PageOutOfRange(page, self.page_count));
        }
        let (png, scale) = self.render_page(page)?;

        let mut lt = LepTess::new(None, &self.config.language)
            .map_err(|e| Error::Ocr(format!("Failed to initialize Tesseract: {}", e)))?;
        lt.set_image_from_mem(&png)
            .map_err(|e| Error::Ocr(format!("Failed to set image from memory: {}", e)))?;

        // None when nothing on the page looks like text
        let Some(boxes) =
            lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
        else {
            return Ok(Vec::new());
        };

        let mut lines = Vec::new();
        for bbox in &boxes {
            let geom = bbox.get_geometry();
            lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);

            let text = lt.get_utf8_text().unwrap_or_default();
            let confidence = lt.mean_text_conf();
            if confidence < self.config.min_confidence {
                log::debug!(
                    "Page {}: dropping OCR line '{}' ({}% confidence)",
                    page,
                    text.trim(),
                    confidence
                );
                continue;
            }

            let bbox = BoundingBox::new(
                geom.x as f32 * scale,
                geom.y as f32 * scale,
                (geom.x + geom.w) as f32 * scale,
                (geom.y + geom.h) as f32 * scale,
            );
            let font_size = bbox.height() / LINE_BOX_EM;
            if let Some(line) = TextLine::new(page, &text, font_size, bbox) {
                lines.push(line);
            }
        }

        log::debug!("Page {}: {} lines from OCR", page, lines.len());
        Ok(lines)
    }
}
