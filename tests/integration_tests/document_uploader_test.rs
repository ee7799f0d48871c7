use std::collections::BTreeMap;
use std::sync::Arc;

use medingest::application::ports::BlobStoreError;
use medingest::application::services::{DocumentUploader, StorageOperation};
use medingest::domain::{BlobPath, ContainerType, DocumentId};
use medingest::infrastructure::storage::StorageClients;
use medingest::presentation::config::StorageProviderSetting;

use crate::helpers::{
    memory_uploader, sample_validation_result, storage_settings, test_validator, write_text_pdf,
};

#[tokio::test]
async fn given_validated_pdf_when_uploading_then_pdf_and_report_are_stored() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "Trial Report.pdf", &["Clinical trial results"]);
    let result = test_validator().validate(&path).await.unwrap();
    let uploader = memory_uploader();
    let id = &result.document_id;

    let record = uploader
        .upload_document(&path, id, &result, &BTreeMap::new())
        .await
        .unwrap();

    assert_eq!(record.container, "raw-documents");
    assert_eq!(record.pdf_blob.blob_name, format!("{id}/{id}.pdf"));
    assert_eq!(record.validation_blob.blob_name, format!("{id}/{id}_validation.json"));

    let blobs = uploader
        .list_documents(ContainerType::RawDocuments, Some(id.as_str()))
        .await
        .unwrap();
    assert_eq!(blobs.len(), 2);

    let pdf = blobs.iter().find(|b| b.name.ends_with(".pdf")).unwrap();
    assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(pdf.metadata.get("document_id"), Some(&id.to_string()));
    assert_eq!(pdf.metadata.get("validation_status").map(String::as_str), Some("passed"));
    assert_eq!(pdf.metadata.get("is_medical").map(String::as_str), Some("true"));

    let report = blobs.iter().find(|b| b.name.ends_with("_validation.json")).unwrap();
    assert_eq!(
        report.metadata.get("content_type").map(String::as_str),
        Some("validation_results")
    );
}

#[tokio::test]
async fn given_uploaded_pdf_when_downloading_then_bytes_are_identical() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "paper.pdf", &["Patient outcomes"]);
    let result = test_validator().validate(&path).await.unwrap();
    let uploader = memory_uploader();
    let id = &result.document_id;
    uploader
        .upload_document(&path, id, &result, &BTreeMap::new())
        .await
        .unwrap();

    let downloaded = uploader
        .download_document(
            id,
            BlobPath::original_pdf(id).as_str(),
            ContainerType::RawDocuments,
        )
        .await
        .unwrap();

    assert_eq!(downloaded.as_ref(), std::fs::read(&path).unwrap().as_slice());
}

#[tokio::test]
async fn given_uploaded_report_when_downloading_then_json_round_trips_the_result() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "paper.pdf", &["Patient outcomes"]);
    let result = test_validator().validate(&path).await.unwrap();
    let uploader = memory_uploader();
    let id = &result.document_id;
    uploader
        .upload_document(&path, id, &result, &BTreeMap::new())
        .await
        .unwrap();

    let raw = uploader
        .download_document(
            id,
            BlobPath::validation_report(id).as_str(),
            ContainerType::RawDocuments,
        )
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(json["document_id"], id.as_str());
    assert_eq!(json["validation_status"], "passed");
    assert_eq!(json["basic_info"]["file_hash"], result.basic_info.file_hash);
}

#[tokio::test]
async fn given_extra_metadata_when_uploading_then_extras_are_tagged_on_pdf() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "paper.pdf", &["Therapy review"]);
    let result = test_validator().validate(&path).await.unwrap();
    let uploader = memory_uploader();
    let extras = BTreeMap::from([("source".to_string(), "pubmed".to_string())]);

    uploader
        .upload_document(&path, &result.document_id, &result, &extras)
        .await
        .unwrap();

    let blobs = uploader
        .list_documents(ContainerType::RawDocuments, None)
        .await
        .unwrap();
    let pdf = blobs.iter().find(|b| b.name.ends_with(".pdf")).unwrap();
    assert_eq!(pdf.metadata.get("source").map(String::as_str), Some("pubmed"));
}

#[tokio::test]
async fn given_processed_artifacts_when_uploading_then_three_blobs_land_in_processed_container() {
    let uploader = memory_uploader();
    let id = DocumentId::from_raw("trial_0a1b2c3d");

    let record = uploader
        .upload_processed_documents(
            &id,
            "# Trial\n\nResults",
            &serde_json::json!({ "title": "Trial" }),
            &serde_json::json!({ "duration_ms": 12 }),
        )
        .await
        .unwrap();

    assert_eq!(record.container, "processed-documents");
    assert_eq!(record.markdown_blob.blob_name, "trial_0a1b2c3d/trial_0a1b2c3d.md");
    let blobs = uploader
        .list_documents(ContainerType::ProcessedDocuments, Some("trial_0a1b2c3d/"))
        .await
        .unwrap();
    let markers: Vec<&str> = blobs
        .iter()
        .filter_map(|b| b.metadata.get("content_type").map(String::as_str))
        .collect();
    assert_eq!(markers.len(), 3);
    assert!(markers.contains(&"markdown"));
    assert!(markers.contains(&"metadata"));
    assert!(markers.contains(&"processing_info"));
    assert!(blobs.iter().all(|b| b.metadata.contains_key("processed_timestamp")));
}

#[tokio::test]
async fn given_uploaded_document_when_deleting_then_no_blob_with_prefix_remains() {
    let uploader = memory_uploader();
    let result = sample_validation_result("keep_me", Some(true));
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "keep.pdf", &["Medical"]);
    let doomed = DocumentId::from_raw("drop_me");
    uploader
        .upload_document(&path, &result.document_id, &result, &BTreeMap::new())
        .await
        .unwrap();
    uploader
        .upload_document(&path, &doomed, &result, &BTreeMap::new())
        .await
        .unwrap();

    let deleted = uploader
        .delete_document(&doomed, ContainerType::RawDocuments)
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    let remaining = uploader
        .list_documents(ContainerType::RawDocuments, None)
        .await
        .unwrap();
    assert!(remaining.iter().all(|b| !b.name.starts_with("drop_me")));
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn given_missing_blob_when_downloading_then_storage_error_wraps_not_found() {
    let uploader = memory_uploader();
    let id = DocumentId::from_raw("ghost");

    let error = uploader
        .download_document(&id, "ghost/ghost.pdf", ContainerType::RawDocuments)
        .await
        .unwrap_err();

    assert_eq!(error.operation, StorageOperation::Download);
    assert_eq!(error.document_id, Some(id));
    assert!(matches!(error.source, BlobStoreError::NotFound(_)));
}

#[tokio::test]
async fn given_missing_source_file_when_uploading_then_error_carries_file_path() {
    let uploader = memory_uploader();
    let result = sample_validation_result("gone", Some(true));
    let path = std::path::PathBuf::from("/nonexistent/gone.pdf");

    let error = uploader
        .upload_document(&path, &result.document_id, &result, &BTreeMap::new())
        .await
        .unwrap_err();

    assert_eq!(error.operation, StorageOperation::UploadDocument);
    assert_eq!(error.file_path.as_deref(), Some(path.as_path()));
    assert!(matches!(error.source, BlobStoreError::Io(_)));
}

#[tokio::test]
async fn given_fresh_provider_when_ensuring_containers_then_each_is_created_once() {
    let clients =
        StorageClients::new(storage_settings(StorageProviderSetting::Memory, "")).unwrap();
    let uploader = DocumentUploader::new(Arc::new(clients));

    let first = uploader.ensure_containers().await.unwrap();
    let second = uploader.ensure_containers().await.unwrap();

    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|(_, created)| *created));
    assert!(second.iter().all(|(_, created)| !*created));
}
