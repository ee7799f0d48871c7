use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{BlobMetadata, BlobPath, BlobReference, BlobSummary, ContainerType};

/// Content settings written with a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobProperties {
    pub content_type: String,
    pub content_disposition: Option<String>,
    pub metadata: BlobMetadata,
}

impl BlobProperties {
    pub fn new(content_type: impl Into<String>, metadata: BlobMetadata) -> Self {
        Self {
            content_type: content_type.into(),
            content_disposition: None,
            metadata,
        }
    }

    pub fn with_disposition(mut self, disposition: impl Into<String>) -> Self {
        self.content_disposition = Some(disposition.into());
        self
    }
}

/// Handle on a single blob container. Writes overwrite unconditionally.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn container_name(&self) -> &str;

    /// Creates the container when missing. Returns `true` if it was created.
    async fn ensure_container(&self) -> Result<bool, BlobStoreError>;

    async fn put(
        &self,
        path: &BlobPath,
        data: Bytes,
        properties: &BlobProperties,
    ) -> Result<BlobReference, BlobStoreError>;

    async fn fetch(&self, path: &BlobPath) -> Result<Bytes, BlobStoreError>;

    /// Lists blobs whose full name starts with `prefix` (plain string match,
    /// not path segments).
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<BlobSummary>, BlobStoreError>;

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobStoreError>;

    fn url(&self, path: &BlobPath) -> String;
}

/// Resolves logical container types to live store handles.
pub trait BlobStoreProvider: Send + Sync {
    fn container(&self, container_type: ContainerType)
    -> Result<Arc<dyn BlobStore>, BlobStoreError>;

    fn configured_containers(&self) -> Vec<ContainerType>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("list failed: {0}")]
    ListFailed(String),
    #[error("container creation failed: {0}")]
    ContainerCreationFailed(String),
    #[error("no container configured for type {0}")]
    UnknownContainer(ContainerType),
    #[error("storage configuration: {0}")]
    Configuration(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
