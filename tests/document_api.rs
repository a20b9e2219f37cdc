//! Integration test: Document API

mod common;

use manuscript_format::{Document, Error, Package, Run};
use std::path::Path;

#[test]
fn test_document_open_and_read() {
    let doc = Document::from_bytes(&common::manuscript_docx()).expect("Failed to open document");

    assert_eq!(doc.paragraph_count(), 8);
    assert_eq!(doc.table_count(), 1);

    let text = doc.text();
    assert!(text.contains("Chapter One"));
    assert!(text.contains("It was a dark night & cold."));
    assert!(text.contains("See the site"));
    assert!(!text.contains("Nested cell"));
}

#[test]
fn test_paragraph_iteration() {
    let doc = Document::from_bytes(&common::manuscript_docx()).unwrap();

    let styles: Vec<_> = doc.paragraphs().map(|p| p.style()).collect();
    assert_eq!(styles[0], Some("Heading1"));
    assert_eq!(styles[2], Some("Caption"));
    assert_eq!(styles[7], Some("TOC1"));

    let para = doc.paragraph(1).expect("Should have 2nd paragraph");
    let runs: Vec<_> = para.runs().collect();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text(), "It was a ");
    assert_eq!(runs[0].font_size_pt(), Some(11.0));
    assert_eq!(runs[1].text(), "dark");
}

#[test]
fn test_style_names() {
    let doc = Document::from_bytes(&common::manuscript_docx()).unwrap();
    let styles = doc.styles();

    assert_eq!(styles.paragraph_style_name(Some("Heading1")), Some("Heading 1"));
    assert_eq!(styles.paragraph_style_name(Some("Caption")), Some("Caption"));
    assert_eq!(styles.paragraph_style_name(None), Some("Normal"));
    assert_eq!(styles.paragraph_style_name(Some("Missing")), Some("Missing"));
}

#[test]
fn test_sections_in_document_order() {
    let doc = Document::from_bytes(&common::manuscript_docx()).unwrap();
    let sections = doc.sections();

    assert_eq!(sections.len(), 2);
    for section in sections {
        assert_eq!(section.margins_twips(), Some([Some(720); 4]));
    }
}

#[test]
fn test_create_new_document() {
    let mut doc = Document::new();
    doc.add_paragraph("Hello from Rust!");
    doc.add_paragraph("This is the second paragraph.");

    assert_eq!(doc.paragraph_count(), 2);
    assert_eq!(doc.text(), "Hello from Rust!\nThis is the second paragraph.");

    let bytes = doc.to_bytes().expect("Should serialize to bytes");
    assert_eq!(&bytes[0..2], b"PK", "Should be valid ZIP file");

    let doc2 = Document::from_bytes(&bytes).expect("Should deserialize");
    assert_eq!(doc2.text(), doc.text());
    assert!(doc2.styles().get("Normal").is_some());
}

#[test]
fn test_create_document_with_runs() {
    let mut doc = Document::new();

    let heading = doc.add_paragraph("My Manuscript");
    heading.set_style("Heading1");

    let para = doc.add_empty_paragraph();
    let mut run = Run::new("Sized text");
    run.set_font_size_pt(14.0);
    para.add_run(run);
    para.add_run(Run::new(" and plain text"));

    let bytes = doc.to_bytes().expect("Should serialize");
    let doc2 = Document::from_bytes(&bytes).expect("Should deserialize");

    assert_eq!(doc2.paragraph_count(), 2);
    assert_eq!(doc2.paragraph(0).unwrap().style(), Some("Heading1"));
    let second = doc2.paragraph(1).unwrap();
    assert_eq!(second.text(), "Sized text and plain text");
    assert_eq!(second.runs().next().unwrap().font_size_pt(), Some(14.0));
}

#[test]
fn test_roundtrip_existing_document() {
    let mut doc = Document::from_bytes(&common::manuscript_docx()).expect("Should open");
    let original_text = doc.text();
    let original_count = doc.paragraph_count();

    let bytes = doc.to_bytes().expect("Should serialize");
    let doc2 = Document::from_bytes(&bytes).expect("Should deserialize");

    assert_eq!(doc2.paragraph_count(), original_count);
    assert_eq!(doc2.text(), original_text);
    assert_eq!(doc2.body(), doc.body());
    assert_eq!(doc2.styles(), doc.styles());
}

#[test]
fn test_roundtrip_preserves_other_parts() {
    let mut doc = Document::from_bytes(&common::manuscript_docx()).unwrap();
    let bytes = doc.to_bytes().unwrap();
    let package = Package::from_bytes(&bytes).unwrap();

    let names: Vec<_> = package.part_names().collect();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/theme/theme1.xml",
            "word/media/image1.png",
        ]
    );
    assert_eq!(package.part("word/media/image1.png"), Some(common::IMAGE));
    assert_eq!(
        package.part_str("word/theme/theme1.xml").unwrap(),
        Some(common::THEME)
    );
    assert_eq!(
        package.part_str("word/_rels/document.xml.rels").unwrap(),
        Some(common::DOCUMENT_RELS)
    );

    let document_xml = package.part_str("word/document.xml").unwrap().unwrap();
    assert!(document_xml.contains(r#"mc:Ignorable="w14""#));
    assert!(document_xml.contains(r#"w14:paraId="00000001""#));
    assert!(document_xml.contains(r#"<w:bookmarkStart w:id="0" w:name="_GoBack"/>"#));
    assert!(document_xml.contains("<m:oMath>"));
    assert!(document_xml.contains("night &amp; cold."));

    let styles_xml = package.part_str("word/styles.xml").unwrap().unwrap();
    assert!(styles_xml.contains("<w:latentStyles"));
    assert!(styles_xml.contains(r#"w:cstheme="minorBidi""#));
}

#[test]
fn test_invalid_package_rejected() {
    assert!(Document::from_bytes(b"not a zip archive").is_err());

    let without_document = common::build_package(&[(
        "_rels/.rels",
        common::PACKAGE_RELS.as_bytes(),
    )]);
    assert!(Document::from_bytes(&without_document).is_err());
}

#[test]
fn test_truncated_document_part_rejected() {
    let err = Document::from_bytes(&common::truncated_manuscript_docx()).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument(_)), "{}", err);
    assert!(err.to_string().contains("Unexpected EOF"), "{}", err);
}

#[test]
fn test_save_to_file() {
    let output_path = Path::new("target/test_output.docx");
    std::fs::create_dir_all("target").ok();

    let mut doc = Document::new();
    doc.add_paragraph("Test manuscript created by manuscript-format");
    doc.add_paragraph("This is a test paragraph.");

    doc.save(output_path).expect("Should save to file");
    assert!(output_path.exists(), "Output file should exist");

    let doc2 = Document::open(output_path).expect("Should reopen");
    assert_eq!(doc2.paragraph_count(), 2);
    assert!(doc2.text().contains("Test manuscript"));

    std::fs::remove_file(output_path).ok();
}
