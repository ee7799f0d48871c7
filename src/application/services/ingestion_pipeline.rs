use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::{ConversionError, ConvertedDocument, DocumentConverter};
use crate::domain::{
    DocumentId, DocumentTypeHint, PdfMetadata, ProcessedUploadRecord, UploadRecord,
    ValidationResult,
};

use super::document_uploader::{DocumentUploader, StorageError};
use super::pdf_validator::{FileValidationError, PdfValidator};

/// Linear single-document flow: validate, upload the original, then
/// optionally convert and upload the derived artifacts.
pub struct IngestionPipeline {
    validator: Arc<PdfValidator>,
    uploader: Arc<DocumentUploader>,
    converter: Option<Arc<dyn DocumentConverter>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionOutcome {
    pub validation: ValidationResult,
    pub upload: UploadRecord,
    pub processed: Option<ProcessedUploadRecord>,
}

/// Body of the `{document_id}_metadata.json` artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedMetadata<'a> {
    pub document_id: &'a DocumentId,
    pub filename: &'a str,
    pub file_hash: &'a str,
    pub page_count: usize,
    pub pdf_metadata: &'a PdfMetadata,
    pub is_medical_content: Option<bool>,
    pub document_type_hints: &'a [DocumentTypeHint],
}

impl<'a> ExtractedMetadata<'a> {
    pub fn from_validation(result: &'a ValidationResult) -> Self {
        Self {
            document_id: &result.document_id,
            filename: &result.basic_info.filename,
            file_hash: &result.basic_info.file_hash,
            page_count: result.pdf_info.page_count,
            pdf_metadata: &result.pdf_info.pdf_metadata,
            is_medical_content: result.medical_info.is_medical_content,
            document_type_hints: &result.medical_info.document_type_hints,
        }
    }
}

/// Body of the `{document_id}_processing.json` artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingInfo {
    pub converter: String,
    pub model_id: String,
    pub api_version: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub page_count: Option<usize>,
    pub markdown_characters: usize,
}

impl IngestionPipeline {
    pub fn new(validator: Arc<PdfValidator>, uploader: Arc<DocumentUploader>) -> Self {
        Self {
            validator,
            uploader,
            converter: None,
        }
    }

    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    #[tracing::instrument(skip(self, path, extra_metadata), fields(file = %path.display()))]
    pub async fn ingest(
        &self,
        path: &Path,
        extra_metadata: &BTreeMap<String, String>,
    ) -> Result<IngestionOutcome, IngestionError> {
        let validation = self.validator.validate(path).await?;
        let document_id = validation.document_id.clone();

        let upload = self
            .uploader
            .upload_document(path, &document_id, &validation, extra_metadata)
            .await?;

        let processed = match &self.converter {
            Some(converter) => Some(self.process(converter.as_ref(), path, &validation).await?),
            None => None,
        };

        tracing::info!(document_id = %document_id, processed = processed.is_some(), "Ingestion complete");

        Ok(IngestionOutcome {
            validation,
            upload,
            processed,
        })
    }

    async fn process(
        &self,
        converter: &dyn DocumentConverter,
        path: &Path,
        validation: &ValidationResult,
    ) -> Result<ProcessedUploadRecord, IngestionError> {
        let data = tokio::fs::read(path).await?;

        let started_at = Utc::now();
        let timer = Instant::now();
        let converted = converter.convert(&data, &validation.document_id).await?;
        let processing_info = processing_info(converter.name(), &converted, started_at, timer);

        let record = self
            .uploader
            .upload_processed_documents(
                &validation.document_id,
                &converted.markdown,
                &ExtractedMetadata::from_validation(validation),
                &processing_info,
            )
            .await?;

        Ok(record)
    }
}

fn processing_info(
    converter: &str,
    converted: &ConvertedDocument,
    started_at: DateTime<Utc>,
    timer: Instant,
) -> ProcessingInfo {
    ProcessingInfo {
        converter: converter.to_string(),
        model_id: converted.model_id.clone(),
        api_version: converted.api_version.clone(),
        started_at,
        completed_at: Utc::now(),
        duration_ms: timer.elapsed().as_millis() as u64,
        page_count: converted.page_count,
        markdown_characters: converted.markdown.chars().count(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("validation: {0}")]
    Validation(#[from] FileValidationError),
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("conversion: {0}")]
    Conversion(#[from] ConversionError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
