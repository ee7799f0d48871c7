mod blob_store;
mod document_converter;
mod pdf_inspector;

pub use blob_store::{BlobProperties, BlobStore, BlobStoreError, BlobStoreProvider};
pub use document_converter::{ConversionError, ConvertedDocument, DocumentConverter};
pub use pdf_inspector::{PageSample, PdfInspectionError, PdfInspector, PdfStructure};
