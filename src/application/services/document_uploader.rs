use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

use crate::application::ports::{BlobProperties, BlobStore, BlobStoreError, BlobStoreProvider};
use crate::domain::{
    BlobMetadata, BlobPath, BlobSummary, ContainerType, DocumentId, ProcessedUploadRecord,
    UploadRecord, ValidationResult,
};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const JSON_CONTENT_TYPE: &str = "application/json";
const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Persists validated documents and their derived artifacts under a
/// `{document_id}/` namespace. Failures are returned as [`StorageError`]
/// and never retried here.
pub struct DocumentUploader {
    stores: Arc<dyn BlobStoreProvider>,
}

impl DocumentUploader {
    pub fn new(stores: Arc<dyn BlobStoreProvider>) -> Self {
        Self { stores }
    }

    #[tracing::instrument(skip_all, fields(document_id = %document_id, file = %file_path.display()))]
    pub async fn upload_document(
        &self,
        file_path: &Path,
        document_id: &DocumentId,
        validation_result: &ValidationResult,
        extra_metadata: &BTreeMap<String, String>,
    ) -> Result<UploadRecord, StorageError> {
        tracing::info!("Starting document upload");
        let on_error = |source: BlobStoreError| {
            let error = StorageError::new(StorageOperation::UploadDocument, source)
                .for_document(document_id)
                .for_file(file_path);
            tracing::error!(error = %error, "Document upload failed");
            error
        };

        let store = self
            .prepared_container(ContainerType::RawDocuments)
            .await
            .map_err(on_error)?;

        let uploaded_at = Utc::now();
        let data = tokio::fs::read(file_path)
            .await
            .map_err(|e| on_error(BlobStoreError::Io(e)))?;

        let pdf_path = BlobPath::original_pdf(document_id);
        let pdf_properties = BlobProperties::new(
            PDF_CONTENT_TYPE,
            BlobMetadata::for_raw_upload(validation_result, uploaded_at, extra_metadata),
        )
        .with_disposition(attachment_disposition(file_path));
        let pdf_blob = store
            .put(&pdf_path, Bytes::from(data), &pdf_properties)
            .await
            .map_err(on_error)?;

        let validation_path = BlobPath::validation_report(document_id);
        let validation_blob = store
            .put(
                &validation_path,
                to_pretty_json(validation_result).map_err(on_error)?,
                &BlobProperties::new(
                    JSON_CONTENT_TYPE,
                    BlobMetadata::for_artifact(
                        document_id,
                        "validation_results",
                        "upload_timestamp",
                        uploaded_at,
                    ),
                ),
            )
            .await
            .map_err(on_error)?;

        tracing::info!(
            container = store.container_name(),
            blob = %pdf_path,
            "Document uploaded"
        );

        Ok(UploadRecord {
            document_id: document_id.clone(),
            pdf_blob,
            validation_blob,
            upload_timestamp: uploaded_at,
            container: store.container_name().to_string(),
        })
    }

    #[tracing::instrument(skip_all, fields(document_id = %document_id))]
    pub async fn upload_processed_documents<M, P>(
        &self,
        document_id: &DocumentId,
        markdown: &str,
        metadata: &M,
        processing_info: &P,
    ) -> Result<ProcessedUploadRecord, StorageError>
    where
        M: Serialize + ?Sized,
        P: Serialize + ?Sized,
    {
        tracing::info!("Uploading processed documents");
        let on_error = |source: BlobStoreError| {
            let error = StorageError::new(StorageOperation::UploadProcessed, source)
                .for_document(document_id);
            tracing::error!(error = %error, "Processed document upload failed");
            error
        };

        let store = self
            .prepared_container(ContainerType::ProcessedDocuments)
            .await
            .map_err(on_error)?;

        let processed_at = Utc::now();
        let tags = |marker: &str| {
            BlobMetadata::for_artifact(document_id, marker, "processed_timestamp", processed_at)
        };

        let markdown_blob = store
            .put(
                &BlobPath::markdown(document_id),
                Bytes::copy_from_slice(markdown.as_bytes()),
                &BlobProperties::new(MARKDOWN_CONTENT_TYPE, tags("markdown")),
            )
            .await
            .map_err(on_error)?;

        let metadata_blob = store
            .put(
                &BlobPath::extracted_metadata(document_id),
                to_pretty_json(metadata).map_err(on_error)?,
                &BlobProperties::new(JSON_CONTENT_TYPE, tags("metadata")),
            )
            .await
            .map_err(on_error)?;

        let processing_blob = store
            .put(
                &BlobPath::processing_info(document_id),
                to_pretty_json(processing_info).map_err(on_error)?,
                &BlobProperties::new(JSON_CONTENT_TYPE, tags("processing_info")),
            )
            .await
            .map_err(on_error)?;

        tracing::info!(container = store.container_name(), "Processed documents uploaded");

        Ok(ProcessedUploadRecord {
            document_id: document_id.clone(),
            markdown_blob,
            metadata_blob,
            processing_blob,
            upload_timestamp: processed_at,
            container: store.container_name().to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_documents(
        &self,
        container_type: ContainerType,
        prefix: Option<&str>,
    ) -> Result<Vec<BlobSummary>, StorageError> {
        let on_error = |source: BlobStoreError| {
            let error = StorageError::new(StorageOperation::List, source);
            tracing::error!(error = %error, "Document listing failed");
            error
        };

        let store = self.stores.container(container_type).map_err(on_error)?;
        let blobs = store.list(prefix).await.map_err(on_error)?;

        tracing::info!(count = blobs.len(), "Listed documents");
        Ok(blobs)
    }

    #[tracing::instrument(skip(self, document_id), fields(document_id = %document_id))]
    pub async fn download_document(
        &self,
        document_id: &DocumentId,
        blob_name: &str,
        container_type: ContainerType,
    ) -> Result<Bytes, StorageError> {
        let on_error = |source: BlobStoreError| {
            let error =
                StorageError::new(StorageOperation::Download, source).for_document(document_id);
            tracing::error!(error = %error, "Document download failed");
            error
        };

        let store = self.stores.container(container_type).map_err(on_error)?;
        let data = store
            .fetch(&BlobPath::from_raw(blob_name))
            .await
            .map_err(on_error)?;

        tracing::info!(bytes = data.len(), "Downloaded document");
        Ok(data)
    }

    /// Removes every blob whose name starts with `document_id`. The first
    /// failing delete aborts the whole operation.
    #[tracing::instrument(skip(self, document_id), fields(document_id = %document_id))]
    pub async fn delete_document(
        &self,
        document_id: &DocumentId,
        container_type: ContainerType,
    ) -> Result<usize, StorageError> {
        let on_error = |source: BlobStoreError| {
            let error =
                StorageError::new(StorageOperation::Delete, source).for_document(document_id);
            tracing::error!(error = %error, "Document deletion failed");
            error
        };

        let store = self.stores.container(container_type).map_err(on_error)?;
        let blobs = store
            .list(Some(document_id.as_str()))
            .await
            .map_err(on_error)?;

        for blob in &blobs {
            store
                .delete(&BlobPath::from_raw(blob.name.as_str()))
                .await
                .map_err(on_error)?;
        }

        tracing::info!(deleted = blobs.len(), "Deleted document blobs");
        Ok(blobs.len())
    }

    /// Creates every configured container that does not exist yet and
    /// reports which ones were created.
    pub async fn ensure_containers(&self) -> Result<Vec<(String, bool)>, StorageError> {
        let mut outcome = Vec::new();
        for container_type in self.stores.configured_containers() {
            let store = self
                .stores
                .container(container_type)
                .map_err(|e| StorageError::new(StorageOperation::EnsureContainers, e))?;
            let created = store
                .ensure_container()
                .await
                .map_err(|e| StorageError::new(StorageOperation::EnsureContainers, e))?;
            tracing::info!(container = store.container_name(), created, "Container ready");
            outcome.push((store.container_name().to_string(), created));
        }
        Ok(outcome)
    }

    async fn prepared_container(
        &self,
        container_type: ContainerType,
    ) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        let store = self.stores.container(container_type)?;
        if store.ensure_container().await? {
            tracing::info!(container = store.container_name(), "Created container");
        }
        Ok(store)
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, BlobStoreError> {
    Ok(Bytes::from(serde_json::to_vec_pretty(value)?))
}

fn attachment_disposition(file_path: &Path) -> String {
    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', "'"))
        .unwrap_or_default();
    format!("attachment; filename=\"{name}\"")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    UploadDocument,
    UploadProcessed,
    List,
    Download,
    Delete,
    EnsureContainers,
}

impl StorageOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadDocument => "document upload",
            Self::UploadProcessed => "processed document upload",
            Self::List => "document listing",
            Self::Download => "document download",
            Self::Delete => "document deletion",
            Self::EnsureContainers => "container creation",
        }
    }
}

/// The single error kind surfaced by [`DocumentUploader`]. Carries enough
/// context for the caller to retry or report.
#[derive(Debug, thiserror::Error)]
#[error(
    "{} failed{}: {source}",
    .operation.as_str(),
    context_suffix(.document_id, .file_path)
)]
pub struct StorageError {
    pub operation: StorageOperation,
    pub document_id: Option<DocumentId>,
    pub file_path: Option<PathBuf>,
    #[source]
    pub source: BlobStoreError,
}

impl StorageError {
    pub fn new(operation: StorageOperation, source: BlobStoreError) -> Self {
        Self {
            operation,
            document_id: None,
            file_path: None,
            source,
        }
    }

    pub fn for_document(mut self, document_id: &DocumentId) -> Self {
        self.document_id = Some(document_id.clone());
        self
    }

    pub fn for_file(mut self, file_path: &Path) -> Self {
        self.file_path = Some(file_path.to_path_buf());
        self
    }
}

fn context_suffix(document_id: &Option<DocumentId>, file_path: &Option<PathBuf>) -> String {
    match (document_id, file_path) {
        (Some(id), Some(path)) => format!(" for {id} ({})", path.display()),
        (Some(id), None) => format!(" for {id}"),
        (None, Some(path)) => format!(" for {}", path.display()),
        (None, None) => String::new(),
    }
}
