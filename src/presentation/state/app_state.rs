use std::sync::Arc;

use crate::application::ports::{BlobStoreError, ConversionError, DocumentConverter};
use crate::application::services::{DocumentUploader, IngestionPipeline, PdfValidator};
use crate::infrastructure::storage::StorageClients;
use crate::infrastructure::text_processing::{AzureDocIntelConverter, PdfInspectorAdapter};
use crate::presentation::config::Settings;

/// Services wired from configuration, shared by every command.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<PdfValidator>,
    pub uploader: Arc<DocumentUploader>,
    pub converter: Option<Arc<dyn DocumentConverter>>,
    pub settings: Settings,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Result<Self, AppStateError> {
        let validator = Arc::new(PdfValidator::new(
            Arc::new(PdfInspectorAdapter::new()),
            settings.storage.validation_limits(),
        ));

        let stores = Arc::new(StorageClients::new(settings.storage.clone())?);
        let uploader = Arc::new(DocumentUploader::new(stores));

        let doc_intel = &settings.document_intelligence;
        let converter: Option<Arc<dyn DocumentConverter>> =
            match (doc_intel.enabled, &doc_intel.endpoint, &doc_intel.api_key) {
                (true, Some(endpoint), Some(api_key)) => Some(Arc::new(AzureDocIntelConverter::new(
                    endpoint,
                    api_key,
                    &doc_intel.api_version,
                    &doc_intel.model_id,
                )?)),
                _ => None,
            };

        Ok(Self {
            validator,
            uploader,
            converter,
            settings,
        })
    }

    /// Pipeline with the converter attached only when `convert` is requested.
    pub fn pipeline(&self, convert: bool) -> Result<IngestionPipeline, AppStateError> {
        let pipeline = IngestionPipeline::new(Arc::clone(&self.validator), Arc::clone(&self.uploader));
        if !convert {
            return Ok(pipeline);
        }
        let converter = self
            .converter
            .as_ref()
            .ok_or(AppStateError::ConverterUnavailable)?;
        Ok(pipeline.with_converter(Arc::clone(converter)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("storage setup failed: {0}")]
    Storage(#[from] BlobStoreError),
    #[error("converter setup failed: {0}")]
    Conversion(#[from] ConversionError),
    #[error("conversion requested but document_intelligence is not enabled")]
    ConverterUnavailable,
}
