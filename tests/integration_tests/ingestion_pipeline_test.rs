use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use medingest::application::services::{IngestionError, IngestionPipeline};
use medingest::domain::{BlobPath, ContainerType};

use crate::helpers::{FakeConverter, memory_uploader, test_validator, write_bytes, write_text_pdf};

#[tokio::test]
async fn given_pipeline_without_converter_when_ingesting_then_only_raw_blobs_are_written() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "trial.pdf", &["Randomized clinical trial of therapy"]);
    let uploader = Arc::new(memory_uploader());
    let pipeline = IngestionPipeline::new(Arc::new(test_validator()), Arc::clone(&uploader));

    let outcome = pipeline.ingest(&path, &BTreeMap::new()).await.unwrap();

    assert!(outcome.processed.is_none());
    assert_eq!(outcome.upload.document_id, outcome.validation.document_id);
    let raw = uploader
        .list_documents(ContainerType::RawDocuments, None)
        .await
        .unwrap();
    assert_eq!(raw.len(), 2);
    let processed = uploader
        .list_documents(ContainerType::ProcessedDocuments, None)
        .await
        .unwrap();
    assert!(processed.is_empty());
}

#[tokio::test]
async fn given_converter_when_ingesting_then_markdown_and_reports_are_uploaded() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "study.pdf", &["Patient cohort study"]);
    let uploader = Arc::new(memory_uploader());
    let converter = Arc::new(FakeConverter::returning("# Study\n\nPatient cohort"));
    let pipeline = IngestionPipeline::new(Arc::new(test_validator()), Arc::clone(&uploader))
        .with_converter(converter.clone());

    let outcome = pipeline.ingest(&path, &BTreeMap::new()).await.unwrap();

    assert_eq!(converter.calls.load(Ordering::SeqCst), 1);
    let processed = outcome.processed.unwrap();
    let id = &outcome.validation.document_id;
    assert_eq!(processed.markdown_blob.blob_name, BlobPath::markdown(id).as_str());

    let markdown = uploader
        .download_document(id, BlobPath::markdown(id).as_str(), ContainerType::ProcessedDocuments)
        .await
        .unwrap();
    assert_eq!(markdown.as_ref(), b"# Study\n\nPatient cohort");

    let info = uploader
        .download_document(
            id,
            BlobPath::processing_info(id).as_str(),
            ContainerType::ProcessedDocuments,
        )
        .await
        .unwrap();
    let info: serde_json::Value = serde_json::from_slice(&info).unwrap();
    assert_eq!(info["converter"], "fake");
    assert_eq!(info["model_id"], "fake-layout");
    assert_eq!(info["markdown_characters"], 23);

    let metadata = uploader
        .download_document(
            id,
            BlobPath::extracted_metadata(id).as_str(),
            ContainerType::ProcessedDocuments,
        )
        .await
        .unwrap();
    let metadata: serde_json::Value = serde_json::from_slice(&metadata).unwrap();
    assert_eq!(metadata["document_id"], id.as_str());
    assert_eq!(metadata["filename"], "study.pdf");
}

#[tokio::test]
async fn given_invalid_file_when_ingesting_then_nothing_is_uploaded() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_bytes(dir.path(), "fake.pdf", b"\x89PNG\r\n\x1a\nnot a pdf");
    let uploader = Arc::new(memory_uploader());
    let converter = Arc::new(FakeConverter::returning("unused"));
    let pipeline = IngestionPipeline::new(Arc::new(test_validator()), Arc::clone(&uploader))
        .with_converter(converter.clone());

    let result = pipeline.ingest(&path, &BTreeMap::new()).await;

    assert!(matches!(result, Err(IngestionError::Validation(_))));
    assert_eq!(converter.calls.load(Ordering::SeqCst), 0);
    let raw = uploader
        .list_documents(ContainerType::RawDocuments, None)
        .await
        .unwrap();
    assert!(raw.is_empty());
}

#[tokio::test]
async fn given_failing_converter_when_ingesting_then_conversion_error_after_raw_upload() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "blank.pdf", &["Clinical notes"]);
    let uploader = Arc::new(memory_uploader());
    let pipeline = IngestionPipeline::new(Arc::new(test_validator()), Arc::clone(&uploader))
        .with_converter(Arc::new(FakeConverter::returning("")));

    let result = pipeline.ingest(&path, &BTreeMap::new()).await;

    assert!(matches!(result, Err(IngestionError::Conversion(_))));
    let raw = uploader
        .list_documents(ContainerType::RawDocuments, None)
        .await
        .unwrap();
    assert_eq!(raw.len(), 2);
}
