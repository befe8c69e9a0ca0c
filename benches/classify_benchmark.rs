//! Benchmarks for outline extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfoutline::{BoundingBox, OutlineAnalyzer, TextLine};

/// Builds a small uncompressed PDF with one heading and a body paragraph per page.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut content = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();

    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", i * 2 + 4)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R /F2 3 0 R >> >> >>",
            kids.join(" "),
            page_count
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for i in 0..page_count {
        let mut text = format!("BT /F2 16 Tf 72 720 Td (Section {}) Tj ET\n", i + 1);
        for line in 0..30 {
            text.push_str(&format!(
                "BT /F1 10 Tf 72 {} Td (Body text line {} describing the results in some detail.) Tj ET\n",
                690 - line * 14,
                line
            ));
        }
        objects.push(format!("<< /Type /Page /Parent 2 0 R /Contents {} 0 R >>", i * 2 + 5));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            text.len(),
            text
        ));
    }

    for (i, body) in objects.iter().enumerate() {
        offsets.push(content.len());
        content.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        content.push_str(&format!("{:010} 00000 n \n", offset));
    }
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    content.into_bytes()
}

/// Synthetic lines: a title, numbered sections and body text.
fn create_lines(pages: u32) -> Vec<TextLine> {
    let mut lines = Vec::new();
    for page in 1..=pages {
        let mut y = 60.0;
        if page == 1 {
            let title = BoundingBox::new(72.0, y, 500.0, y + 24.0);
            lines.extend(TextLine::new(page, "Quarterly Operations Review", 24.0, title).map(TextLine::bold));
            y += 40.0;
        }
        for section in 1..=3 {
            let heading = format!("{}.{} Regional Summary", page, section);
            let bbox = BoundingBox::new(72.0, y, 400.0, y + 14.0);
            lines.extend(TextLine::new(page, &heading, 14.0, bbox).map(TextLine::bold));
            y += 22.0;
            for _ in 0..12 {
                lines.extend(TextLine::new(
                    page,
                    "Operating costs remained within the approved budget for the period, with minor variance.",
                    10.0,
                    BoundingBox::new(72.0, y, 540.0, y + 10.0),
                ));
                y += 14.0;
            }
        }
    }
    lines
}

fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdfoutline::detect::sniff_bytes(black_box(&pdf_data)).is_ok());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| pdfoutline::detect::sniff_bytes(black_box(non_pdf_data)).is_err());
    });
}

fn bench_classification(c: &mut Criterion) {
    let analyzer = OutlineAnalyzer::default();
    let mut group = c.benchmark_group("classification");

    for pages in [1u32, 10, 100] {
        let lines = create_lines(pages);
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| analyzer.outline(black_box(&lines)));
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let options = pdfoutline::OutlineOptions::new().without_ocr();
    let mut group = c.benchmark_group("extraction");

    for pages in [1usize, 5, 20] {
        let data = create_test_pdf(pages);
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| {
                let _ = pdfoutline::extract_outline_bytes_with_options(black_box(&data), &options);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_format_detection, bench_classification, bench_extraction);
criterion_main!(benches);
