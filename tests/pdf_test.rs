//! Integration tests for PDF outline extraction.
//!
//! Test documents are built in memory with lopdf's writer.

use docoutline::{
    extract_pdf_bytes, extract_pdf_file, read_pdf_units, Error, HeadingLevel, OutlineEntry,
    Outliner, PageSelection, PdfReader,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One shown string: text, font size, x, baseline y.
type Line = (&'static str, i64, i64, i64);

/// Build a PDF with one Helvetica font and the given lines per page.
fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for &(text, size, x, y) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn report_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![
            ("Annual Report", 24, 72, 720),
            ("Introduction", 20, 72, 680),
            ("This year went well.", 10, 72, 650),
        ],
        vec![
            ("Background", 16, 72, 720),
            ("Some history.", 10, 72, 700),
            ("Details", 13, 72, 670),
        ],
    ])
}

fn write_temp(data: &[u8], name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, data).unwrap();
    (dir, path)
}

#[test]
fn test_read_units_per_line() {
    let (_dir, path) = write_temp(&report_pdf(), "report.pdf");
    let units = read_pdf_units(&path).unwrap();

    let summary: Vec<(&str, Option<f32>, u32)> = units
        .iter()
        .map(|u| (u.text.as_str(), u.font_size, u.page))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Annual Report", Some(24.0), 1),
            ("Introduction", Some(20.0), 1),
            ("This year went well.", Some(10.0), 1),
            ("Background", Some(16.0), 2),
            ("Some history.", Some(10.0), 2),
            ("Details", Some(13.0), 2),
        ]
    );
    assert_eq!(units[0].font_name.as_deref(), Some("Helvetica"));
}

#[test]
fn test_extract_pdf_file() {
    let (_dir, path) = write_temp(&report_pdf(), "report.pdf");
    let doc = extract_pdf_file(&path).unwrap();

    assert_eq!(doc.title, "Annual Report");
    assert_eq!(
        doc.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
            OutlineEntry::new(HeadingLevel::H2, "Background", 2),
            OutlineEntry::new(HeadingLevel::H3, "Details", 2),
        ]
    );
}

#[test]
fn test_extract_pdf_bytes_matches_file() {
    let data = report_pdf();
    let (_dir, path) = write_temp(&data, "report.pdf");
    assert_eq!(extract_pdf_bytes(&data).unwrap(), extract_pdf_file(&path).unwrap());
}

#[test]
fn test_spans_on_one_baseline_form_one_unit() {
    let data = build_pdf(&[vec![
        ("Chapter", 18, 72, 700),
        ("One", 18, 200, 700),
        ("text", 10, 72, 660),
    ]]);
    let units = PdfReader::from_bytes(&data).unwrap().read_units().unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].text, "Chapter One");
    assert_eq!(units[0].font_size, Some(18.0));
}

#[test]
fn test_page_selection() {
    let (_dir, path) = write_temp(&report_pdf(), "report.pdf");
    let doc = Outliner::new()
        .with_pages(PageSelection::Pages(vec![2]))
        .extract(&path)
        .unwrap();

    assert_eq!(doc.title, "Background");
    assert_eq!(
        doc.outline,
        vec![OutlineEntry::new(HeadingLevel::H3, "Details", 2)]
    );
}

#[test]
fn test_page_out_of_range() {
    let data = report_pdf();
    let options = docoutline::ParseOptions::new().with_pages(PageSelection::Range(1..=5));
    let reader = PdfReader::from_bytes_with_options(&data, options).unwrap();
    assert!(matches!(
        reader.read_units(),
        Err(Error::PageOutOfRange(5, 2))
    ));
}

#[test]
fn test_pdf_without_text() {
    let data = build_pdf(&[vec![]]);
    let doc = extract_pdf_bytes(&data).unwrap();
    assert_eq!(doc.title, "");
    assert!(doc.outline.is_empty());
}

#[test]
fn test_not_a_pdf() {
    let (_dir, path) = write_temp(b"# Markdown, really", "fake.pdf");
    assert!(matches!(extract_pdf_file(&path), Err(Error::UnknownFormat)));
}

#[test]
fn test_reader_page_count() {
    let reader = PdfReader::from_bytes(&report_pdf()).unwrap();
    assert_eq!(reader.page_count(), 2);
    let page_two = reader.read_page(2).unwrap();
    assert_eq!(page_two[0].text, "Background");
}
