use medingest::application::ports::{PdfInspectionError, PdfInspector};
use medingest::infrastructure::text_processing::PdfInspectorAdapter;

use crate::helpers::{PdfFixture, write_bytes, write_encrypted_pdf, write_text_pdf};

#[test]
fn given_five_page_pdf_when_sampling_three_then_returns_leading_pages_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(
        dir.path(),
        "five.pdf",
        &["page one", "page two", "page three", "page four", "page five"],
    );
    let inspector = PdfInspectorAdapter::new();

    let structure = inspector.read_structure(&path).unwrap();
    let samples = inspector.sample_pages(&path, 3).unwrap();

    assert_eq!(structure.page_count, 5);
    let numbers: Vec<usize> = samples.iter().map(|s| s.page_number).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert!(samples[1].text.to_lowercase().contains("two"));
}

#[test]
fn given_image_page_when_sampling_then_flags_images_per_page() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = PdfFixture::new()
        .text_page(&["text first"])
        .image_page()
        .write(dir.path(), "mixed.pdf");

    let samples = PdfInspectorAdapter::new().sample_pages(&path, 5).unwrap();

    assert_eq!(samples.len(), 2);
    assert!(!samples[0].has_images);
    assert!(samples[1].has_images);
}

#[test]
fn given_encrypted_pdf_when_reading_structure_then_encrypted_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_encrypted_pdf(dir.path(), "locked.pdf");

    let result = PdfInspectorAdapter::new().read_structure(&path);

    assert!(matches!(result, Err(PdfInspectionError::Encrypted)));
}

#[test]
fn given_garbage_bytes_when_reading_structure_then_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_bytes(dir.path(), "garbage.pdf", b"%PDF-1.7 but nothing else");

    let result = PdfInspectorAdapter::new().read_structure(&path);

    assert!(matches!(result, Err(PdfInspectionError::Parse(_))));
}

#[test]
fn given_pdf_without_info_when_reading_structure_then_metadata_fields_are_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "plain.pdf", &["no info dictionary"]);

    let structure = PdfInspectorAdapter::new().read_structure(&path).unwrap();

    assert_eq!(structure.metadata.title, "");
    assert_eq!(structure.metadata.producer, "");
}

#[test]
fn given_unencrypted_pdf_quoting_encrypt_key_when_reading_then_structure_and_text_are_returned() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = PdfFixture::new()
        .title("/Encrypt in the title", "Records office")
        .text_page(&["See the /Encrypt trailer entry"])
        .write(dir.path(), "quoted.pdf");
    let inspector = PdfInspectorAdapter::new();

    let structure = inspector.read_structure(&path).unwrap();
    let samples = inspector.sample_pages(&path, 3).unwrap();

    assert_eq!(structure.page_count, 1);
    assert_eq!(structure.metadata.title, "/Encrypt in the title");
    assert_eq!(samples.len(), 1);
}
