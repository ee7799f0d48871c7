mod blob_metadata;
mod blob_path;
mod container_type;
mod document_id;
mod upload_record;
mod validation;

pub use blob_metadata::{BlobMetadata, format_timestamp};
pub use blob_path::BlobPath;
pub use container_type::ContainerType;
pub use document_id::DocumentId;
pub use upload_record::{BlobReference, BlobSummary, ProcessedUploadRecord, UploadRecord};
pub use validation::{
    BasicInfo, DocumentTypeHint, MedicalInfo, PdfInfo, PdfMetadata, ValidationResult,
    ValidationStatus,
};
