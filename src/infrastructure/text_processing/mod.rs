mod azure_doc_intel_converter;
mod pdf_inspector_adapter;

pub use azure_doc_intel_converter::{
    AnalysisStatus, AnalyzeResponse, AnalyzeResult, AzureDocIntelConverter, DEFAULT_API_VERSION,
    DEFAULT_MODEL_ID, INITIAL_BACKOFF, MAX_BACKOFF, POLL_TIMEOUT, PollStep, next_backoff,
    parse_retry_after,
};
pub use pdf_inspector_adapter::PdfInspectorAdapter;
