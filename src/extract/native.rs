//! Text-layer extraction with lopdf.
//!
//! Page content streams are decoded operator by operator. The text and
//! graphics state needed to place each shown string is tracked (text matrix,
//! line matrix, leading, current transformation matrix), every string becomes
//! a positioned span, and spans sharing a baseline are merged into lines.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use super::LineExtractor;
use crate::detect::{sniff_bytes, sniff_path, PdfHeader};
use crate::error::{Error, Result};
use crate::model::{style_from_font_name, BoundingBox, TextLine};

/// Default page height (US Letter) when no MediaBox can be found.
const DEFAULT_PAGE_TOP: f32 = 792.0;

/// TJ adjustments beyond this many thousandths of an em read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Parent chains deeper than this are treated as broken.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Reads lines from the PDF's own text layer.
pub struct NativeExtractor {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    header: PdfHeader,
}

impl NativeExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Self::from_document(doc, header)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Self::from_document(doc, header)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, header: PdfHeader) -> Result<Self> {
        doc.catalog()
            .map_err(|e| Error::Corrupted(format!("Missing document catalog: {}", e)))?;
        let pages = doc.get_pages();
        log::debug!("Loaded {} with {} pages", header, pages.len());
        Ok(Self { doc, pages, header })
    }

    /// The header the document was opened with.
    pub fn header(&self) -> &PdfHeader {
        &self.header
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Extract raw spans of one page in PDF user space.
    fn page_spans(&self, page: u32, page_id: ObjectId) -> Result<Vec<Span>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let mut fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
            fonts.insert(name.clone(), base_font);
        }

        let content = self.page_content(page, page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let content = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let decode = |font_key: &[u8], bytes: &[u8]| -> String {
            let encoding = lopdf_fonts
                .get(font_key)
                .and_then(|f| f.get_font_encoding(&self.doc).ok());
            match encoding {
                Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                    .unwrap_or_else(|_| decode_text_simple(bytes)),
                None => decode_text_simple(bytes),
            }
        };

        let mut state = GraphicsState::default();
        let mut saved: Vec<Matrix> = Vec::new();
        let mut spans = Vec::new();
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => saved.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = saved.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.ctm = multiply(&m, &state.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.begin_text();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(key) = &operands[0] {
                            state.font_name = fonts
                                .get(key)
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                            state.font_key = key.clone();
                        }
                        state.font_size = get_number(&operands[1]).unwrap_or(state.font_size);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(operands) {
                        state.line_matrix = m;
                        state.text_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let (true, Some(Object::String(bytes, _))) = (in_text_block, operands.first())
                    {
                        let text = decode(&state.font_key, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let (true, Some(Object::String(bytes, _))) =
                        (in_text_block, operands.get(text_idx))
                    {
                        let text = decode(&state.font_key, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                "TJ" => {
                    if let (true, Some(Object::Array(items))) = (in_text_block, operands.first()) {
                        let mut combined = String::new();
                        let mut adjustment = 0.0;
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    combined.push_str(&decode(&state.font_key, bytes))
                                }
                                Object::Integer(_) | Object::Real(_) => {
                                    let n = -get_number(item).unwrap_or(0.0);
                                    adjustment += n;
                                    if n > TJ_SPACE_THRESHOLD && needs_space_after(&combined) {
                                        combined.push(' ');
                                    }
                                }
                                _ => {}
                            }
                        }
                        state.show(combined, adjustment, &mut spans);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Concatenated, decompressed content streams of a page.
    ///
    /// A page without `Contents` is blank, not an error.
    fn page_content(&self, page: u32, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<ObjectId> = match contents {
            Object::Reference(r) => vec![*r],
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => {
                return Err(Error::TextExtract(format!(
                    "Page {}: invalid content stream",
                    page
                )))
            }
        };

        let mut content = Vec::new();
        for r in refs {
            match self.doc.get_object(r) {
                Ok(Object::Stream(s)) => {
                    let data = s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                Ok(Object::Array(arr)) => {
                    // Some writers put an indirect array of streams here.
                    for inner in arr.iter().filter_map(|o| o.as_reference().ok()) {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(inner) {
                            let data = s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone());
                            content.extend_from_slice(&data);
                            content.push(b'\n');
                        }
                    }
                }
                _ => log::debug!("Page {}: skipping non-stream content object {:?}", page, r),
            }
        }
        Ok(content)
    }

    /// Top edge of the page's MediaBox, following inherited attributes.
    fn page_top(&self, page_id: ObjectId) -> f32 {
        let mut current = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(dict) = current else {
                break;
            };
            if let Ok(array) = dict.get(b"MediaBox").and_then(|o| o.as_array()) {
                if array.len() >= 4 {
                    let y0 = array[1].as_float().unwrap_or(0.0);
                    let y1 = array[3].as_float().unwrap_or(DEFAULT_PAGE_TOP);
                    return y0.max(y1);
                }
            }
            current = dict
                .get(b"Parent")
                .and_then(|o| o.as_reference())
                .and_then(|r| self.doc.get_dictionary(r))
                .ok();
        }
        DEFAULT_PAGE_TOP
    }
}

impl LineExtractor for NativeExtractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page(&self, page: u32) -> Result<Vec<TextLine>> {
        let page_id = self.page_id(page)?;
        let spans = self.page_spans(page, page_id)?;
        let page_top = self.page_top(page_id);

        let lines: Vec<TextLine> = group_spans_into_lines(spans)
            .iter()
            .filter_map(|spans| build_line(page, page_top, spans))
            .collect();
        log::debug!("Page {}: {} lines from text layer", page, lines.len());
        Ok(lines)
    }
}

/// A shown string positioned in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
struct Span {
    text: String,
    /// Left edge
    x: f32,
    /// Baseline
    y: f32,
    width: f32,
    font_size: f32,
    is_bold: bool,
    is_italic: bool,
}

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m × n` for PDF row-vector matrices `[a b c d e f]`.
fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// Text and graphics state relevant to placing glyphs.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_size: f32,
    font_key: Vec<u8>,
    font_name: String,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
            font_size: 12.0,
            font_key: Vec::new(),
            font_name: String::new(),
        }
    }
}

impl GraphicsState {
    fn begin_text(&mut self) {
        self.text_matrix = IDENTITY;
        self.line_matrix = IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Record a span for `text` and advance the text matrix past it.
    ///
    /// `adjustment` is the sum of TJ offsets in thousandths of an em,
    /// positive moving right.
    fn show(&mut self, text: String, adjustment: f32, spans: &mut Vec<Span>) {
        let glyphs = text.chars().count() as f32;
        let advance = glyphs * AVG_GLYPH_WIDTH * self.font_size + adjustment / 1000.0 * self.font_size;

        let rendering = multiply(&self.text_matrix, &self.ctm);
        let horizontal = (rendering[0] * rendering[0] + rendering[1] * rendering[1]).sqrt();
        let vertical = (rendering[2] * rendering[2] + rendering[3] * rendering[3]).sqrt();

        if !text.trim().is_empty() {
            let (is_bold, is_italic) = style_from_font_name(&self.font_name);
            spans.push(Span {
                text,
                x: rendering[4],
                y: rendering[5],
                width: (advance * horizontal).max(0.0),
                font_size: self.font_size * vertical,
                is_bold,
                is_italic,
            });
        }

        self.text_matrix = multiply(&translation(advance, 0.0), &self.text_matrix);
    }
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = get_number(obj)?;
    }
    Some(m)
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Group spans sharing a baseline, top to bottom.
fn group_spans_into_lines(mut spans: Vec<Span>) -> Vec<Vec<Span>> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

/// Turn the spans of one baseline into a [`TextLine`] in top-down
/// coordinates.
fn build_line(page: u32, page_top: f32, spans: &[Span]) -> Option<TextLine> {
    let first = spans.first()?;
    let text = join_spans(spans);

    let mut weight_by_size: BTreeMap<i32, usize> = BTreeMap::new();
    let mut bold_chars = 0;
    let mut italic_chars = 0;
    let mut total_chars = 0;
    for span in spans {
        let chars = span.text.chars().filter(|c| !c.is_whitespace()).count();
        *weight_by_size
            .entry((span.font_size * 10.0).round() as i32)
            .or_insert(0) += chars;
        total_chars += chars;
        if span.is_bold {
            bold_chars += chars;
        }
        if span.is_italic {
            italic_chars += chars;
        }
    }
    let font_size = weight_by_size
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
        .map(|(&key, _)| key as f32 / 10.0)
        .unwrap_or(first.font_size);

    let baseline = first.y;
    let x0 = spans.iter().map(|s| s.x).fold(f32::MAX, f32::min);
    let x1 = spans.iter().map(|s| s.x + s.width).fold(f32::MIN, f32::max);
    let bbox = BoundingBox::new(
        x0,
        page_top - (baseline + font_size * 0.8),
        x1,
        page_top - (baseline - font_size * 0.2),
    );

    let is_bold = total_chars > 0 && bold_chars * 2 > total_chars;
    let is_italic = total_chars > 0 && italic_chars * 2 > total_chars;
    TextLine::new(page, &text, font_size, bbox).map(|line| line.with_style(is_bold, is_italic))
}

/// Join spans left to right, inserting a space where the horizontal gap is
/// wider than a fifth of a glyph.
fn join_spans(spans: &[Span]) -> String {
    let mut result = String::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - (prev.x + prev.width);
            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * AVG_GLYPH_WIDTH
            };

            let spaceless = matches!(
                (prev.text.chars().last(), span.text.chars().next()),
                (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b)
            );
            if gap > avg_char_width * 0.2
                && !spaceless
                && needs_space_after(&result)
                && !span.text.starts_with(char::is_whitespace)
            {
                result.push(' ');
            }
        }
        result.push_str(&span.text);
    }
    result
}

fn needs_space_after(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Decoding fallback for fonts without a usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
