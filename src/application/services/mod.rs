mod content_sniffer;
mod document_uploader;
mod ingestion_pipeline;
mod medical_classifier;
mod pdf_validator;
mod table_detection;

pub use content_sniffer::{PDF_MIME, sniff_mime_type};
pub use document_uploader::{DocumentUploader, StorageError, StorageOperation};
pub use ingestion_pipeline::{
    ExtractedMetadata, IngestionError, IngestionOutcome, IngestionPipeline, ProcessingInfo,
};
pub use medical_classifier::{MEDICAL_KEYWORDS, REGULATORY_KEYWORDS, classify_medical_content};
pub use pdf_validator::{
    DEFAULT_PARSE_TIMEOUT, FileValidationError, PdfValidator, ValidationFailure, ValidationLimits,
};
pub use table_detection::detect_table_patterns;
