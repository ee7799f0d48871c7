use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;

use crate::application::ports::{BlobProperties, BlobStore, BlobStoreError};
use crate::domain::{BlobPath, BlobReference, BlobSummary};

use super::object_container::{ObjectContainer, to_attributes};

/// Process-local container backed by the `object_store` in-memory backend.
/// Content settings are kept as object attributes.
pub struct InMemoryBlobStore {
    container: String,
    objects: ObjectContainer,
    created: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            objects: ObjectContainer::new(Arc::new(InMemory::new())),
            created: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn container_name(&self) -> &str {
        &self.container
    }

    async fn ensure_container(&self) -> Result<bool, BlobStoreError> {
        Ok(!self.created.swap(true, Ordering::SeqCst))
    }

    async fn put(
        &self,
        path: &BlobPath,
        data: Bytes,
        properties: &BlobProperties,
    ) -> Result<BlobReference, BlobStoreError> {
        self.objects
            .put(path, data, to_attributes(properties))
            .await?;
        Ok(BlobReference {
            blob_name: path.to_string(),
            url: self.url(path),
        })
    }

    async fn fetch(&self, path: &BlobPath) -> Result<Bytes, BlobStoreError> {
        self.objects.fetch(path).await
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<BlobSummary>, BlobStoreError> {
        self.objects.list(prefix).await
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobStoreError> {
        self.objects.delete(path).await
    }

    fn url(&self, path: &BlobPath) -> String {
        format!("memory://{}/{path}", self.container)
    }
}
