use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document_id::DocumentId;

/// Where a blob landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobReference {
    pub blob_name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub document_id: DocumentId,
    pub pdf_blob: BlobReference,
    pub validation_blob: BlobReference,
    pub upload_timestamp: DateTime<Utc>,
    pub container: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedUploadRecord {
    pub document_id: DocumentId,
    pub markdown_blob: BlobReference,
    pub metadata_blob: BlobReference,
    pub processing_blob: BlobReference,
    pub upload_timestamp: DateTime<Utc>,
    pub container: String,
}

/// One entry of a container listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobSummary {
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}
