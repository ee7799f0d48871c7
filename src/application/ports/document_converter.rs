use async_trait::async_trait;

use crate::domain::DocumentId;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedDocument {
    pub markdown: String,
    pub page_count: Option<usize>,
    pub model_id: String,
    pub api_version: String,
}

/// Turns a PDF into markdown through an external analysis service.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn convert(
        &self,
        data: &[u8],
        document_id: &DocumentId,
    ) -> Result<ConvertedDocument, ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("submit failed: {0}")]
    SubmitFailed(String),
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
    #[error("analysis timed out after {0}s")]
    TimedOut(u64),
    #[error("no content returned for document {0}")]
    EmptyResult(DocumentId),
}
